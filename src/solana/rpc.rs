// src/solana/rpc.rs
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::solana::TOKEN_PROGRAM_ID;

/// Read-only chain queries the wallet store depends on. No transaction
/// submission happens client-side.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance of an account, in lamports.
    async fn lamport_balance(&self, address: &str) -> ClientResult<u64>;

    /// Fungible-token balances held by an owner, keyed by mint address.
    /// Only entries with a positive ui amount are returned.
    async fn token_balances(&self, address: &str) -> ClientResult<HashMap<String, f64>>;
}

/// Solana JSON-RPC client over plain HTTP.
#[derive(Clone)]
pub struct SolanaRpc {
    http: reqwest::Client,
    url: String,
    commitment: String,
}

impl SolanaRpc {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build RPC client: {}", e)))?;

        Ok(Self {
            http,
            url: config.rpc_url.clone(),
            commitment: config.commitment.clone(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> ClientResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.http.post(&self.url).json(&body).send().await?;
        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Rpc(format!("Malformed RPC response: {}", e)))?;

        if let Some(err) = envelope.error {
            return Err(ClientError::Rpc(format!("{} (code {})", err.message, err.code)));
        }
        envelope
            .result
            .ok_or_else(|| ClientError::Rpc("RPC response missing result".to_string()))
    }
}

#[async_trait]
impl ChainClient for SolanaRpc {
    async fn lamport_balance(&self, address: &str) -> ClientResult<u64> {
        let result = self
            .call(
                "getBalance",
                json!([address, { "commitment": self.commitment }]),
            )
            .await?;
        parse_lamport_balance(&result)
    }

    async fn token_balances(&self, address: &str) -> ClientResult<HashMap<String, f64>> {
        let result = self
            .call(
                "getTokenAccountsByOwner",
                json!([
                    address,
                    { "programId": TOKEN_PROGRAM_ID },
                    { "encoding": "jsonParsed", "commitment": self.commitment },
                ]),
            )
            .await?;
        parse_token_accounts(&result)
    }
}

#[derive(Deserialize)]
struct RpcEnvelope {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct BalanceResult {
    value: u64,
}

#[derive(Deserialize)]
struct TokenAccountsResult {
    value: Vec<TokenAccount>,
}

#[derive(Deserialize)]
struct TokenAccount {
    account: TokenAccountData,
}

#[derive(Deserialize)]
struct TokenAccountData {
    data: ParsedData,
}

#[derive(Deserialize)]
struct ParsedData {
    parsed: ParsedInfo,
}

#[derive(Deserialize)]
struct ParsedInfo {
    info: TokenInfo,
}

#[derive(Deserialize)]
struct TokenInfo {
    mint: String,
    #[serde(rename = "tokenAmount")]
    token_amount: TokenAmount,
}

#[derive(Deserialize)]
struct TokenAmount {
    #[serde(rename = "uiAmount")]
    ui_amount: Option<f64>,
}

fn parse_lamport_balance(result: &Value) -> ClientResult<u64> {
    let balance: BalanceResult = serde_json::from_value(result.clone())
        .map_err(|e| ClientError::Rpc(format!("Malformed balance result: {}", e)))?;
    Ok(balance.value)
}

fn parse_token_accounts(result: &Value) -> ClientResult<HashMap<String, f64>> {
    let accounts: TokenAccountsResult = serde_json::from_value(result.clone())
        .map_err(|e| ClientError::Rpc(format!("Malformed token account result: {}", e)))?;

    let mut balances = HashMap::new();
    for entry in accounts.value {
        let info = entry.account.data.parsed.info;
        let amount = info.token_amount.ui_amount.unwrap_or(0.0);
        if amount > 0.0 {
            balances.insert(info.mint, amount);
        }
    }
    Ok(balances)
}
