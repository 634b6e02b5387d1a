// src/wallet/mod.rs
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::AirdropApi;
use crate::error::{ClientError, ClientResult};
use crate::solana::{is_valid_address, symbol_for_mint, ChainClient};
use crate::types::WalletSnapshot;

/// Wallet store: the connected address plus observed balances. The address
/// comes either from an explicit connect or from the session's persisted
/// profile; balances come straight from the chain.
#[derive(Clone)]
pub struct WalletManager {
    api: Arc<dyn AirdropApi>,
    chain: Arc<dyn ChainClient>,
    snapshot: Arc<RwLock<WalletSnapshot>>,
}

impl WalletManager {
    pub fn new(api: Arc<dyn AirdropApi>, chain: Arc<dyn ChainClient>) -> Self {
        Self {
            api,
            chain,
            snapshot: Arc::new(RwLock::new(WalletSnapshot::default())),
        }
    }

    /// Connect a wallet address to the account. The address is validated
    /// locally first; a malformed one is rejected without any network call.
    /// On success the backend profile is updated and balances are fetched
    /// immediately.
    pub async fn connect(&self, address: &str) -> ClientResult<()> {
        if !is_valid_address(address) {
            return Err(ClientError::InvalidAddress(address.to_string()));
        }

        self.api.connect_wallet(address).await?;

        self.snapshot.write().await.address = Some(address.to_string());
        self.refresh_balances().await;
        Ok(())
    }

    /// Adopt the wallet address persisted in the user's profile, without a
    /// connect round trip. Used at session establishment.
    pub async fn adopt(&self, address: &str) {
        if !is_valid_address(address) {
            warn!("Ignoring malformed persisted wallet address");
            return;
        }
        self.snapshot.write().await.address = Some(address.to_string());
        self.refresh_balances().await;
    }

    /// Disconnect: tell the backend to drop the address from the profile,
    /// then clear the address and both balance caches.
    pub async fn disconnect(&self) -> ClientResult<()> {
        self.api.disconnect_wallet().await?;
        *self.snapshot.write().await = WalletSnapshot::default();
        Ok(())
    }

    /// Refresh native and token balances for the connected address.
    /// Best-effort: a query failure is logged and the previous cached
    /// values stay in place.
    pub async fn refresh_balances(&self) {
        let Some(address) = self.address().await else {
            debug!("Balance refresh with no connected wallet");
            return;
        };

        match self.fetch_balances(&address).await {
            Ok((lamports, token_balances)) => {
                let mut snapshot = self.snapshot.write().await;
                // The wallet may have been disconnected or switched while
                // the queries were in flight; drop the result in that case.
                if snapshot.address.as_deref() != Some(address.as_str()) {
                    return;
                }
                snapshot.lamports = lamports;
                snapshot.token_balances = token_balances;
                snapshot.refreshed_at = Some(chrono::Utc::now());
            }
            Err(e) => {
                warn!("Error fetching balances: {}", e);
            }
        }
    }

    async fn fetch_balances(&self, address: &str) -> ClientResult<(u64, HashMap<String, f64>)> {
        let lamports = self.chain.lamport_balance(address).await?;
        let token_balances = self.chain.token_balances(address).await?;
        Ok((lamports, token_balances))
    }

    pub async fn snapshot(&self) -> WalletSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn address(&self) -> Option<String> {
        self.snapshot.read().await.address.clone()
    }

    pub async fn is_connected(&self) -> bool {
        self.snapshot.read().await.is_connected()
    }

    /// Token balances labelled with known symbols, falling back to the
    /// mint address for anything unrecognized.
    pub async fn labelled_balances(&self) -> Vec<(String, f64)> {
        let snapshot = self.snapshot.read().await;
        let mut balances: Vec<(String, f64)> = snapshot
            .token_balances
            .iter()
            .map(|(mint, amount)| {
                let label = symbol_for_mint(mint)
                    .map(str::to_string)
                    .unwrap_or_else(|| mint.clone());
                (label, *amount)
            })
            .collect();
        balances.sort_by(|a, b| a.0.cmp(&b.0));
        balances
    }

    pub fn is_valid_address(address: &str) -> bool {
        is_valid_address(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_user, MockApi, MockChain};

    const ADDRESS: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
    const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn wallet_with(api: Arc<MockApi>, chain: Arc<MockChain>) -> WalletManager {
        WalletManager::new(api, chain)
    }

    fn funded_chain() -> Arc<MockChain> {
        let chain = MockChain::new(2_000_000_000);
        chain.set_token_balance(USDC_MINT, 42.5);
        Arc::new(chain)
    }

    #[tokio::test]
    async fn test_invalid_address_rejected_without_network() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let chain = Arc::new(MockChain::new(0));
        let wallet = wallet_with(api.clone(), chain.clone());

        let err = wallet.connect("not-a-solana-address").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidAddress(_)));
        assert!(api.calls().is_empty());
        assert_eq!(chain.call_count(), 0);
        assert!(!wallet.is_connected().await);
    }

    #[tokio::test]
    async fn test_connect_fetches_balances() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let wallet = wallet_with(api.clone(), funded_chain());

        wallet.connect(ADDRESS).await.unwrap();

        let snapshot = wallet.snapshot().await;
        assert_eq!(snapshot.address.as_deref(), Some(ADDRESS));
        assert_eq!(snapshot.lamports, 2_000_000_000);
        assert_eq!(snapshot.token_balances[USDC_MINT], 42.5);
        assert!(snapshot.refreshed_at.is_some());
        assert_eq!(api.calls(), vec!["connect_wallet"]);
    }

    #[tokio::test]
    async fn test_connect_propagates_backend_rejection() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        *api.connect_error.lock().unwrap() = Some("Wallet already linked".to_string());
        let wallet = wallet_with(api, funded_chain());

        let err = wallet.connect(ADDRESS).await.unwrap_err();
        assert_eq!(err.to_string(), "Wallet already linked");
        assert!(!wallet.is_connected().await);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_previous_balances() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let chain = funded_chain();
        let wallet = wallet_with(api, chain.clone());

        wallet.connect(ADDRESS).await.unwrap();
        let before = wallet.snapshot().await;

        chain.set_failing(true);
        wallet.refresh_balances().await;

        let after = wallet.snapshot().await;
        assert_eq!(after.lamports, before.lamports);
        assert_eq!(after.token_balances, before.token_balances);
        assert_eq!(after.refreshed_at, before.refreshed_at);
    }

    #[tokio::test]
    async fn test_disconnect_clears_everything() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let wallet = wallet_with(api.clone(), funded_chain());

        wallet.connect(ADDRESS).await.unwrap();
        wallet.disconnect().await.unwrap();

        let snapshot = wallet.snapshot().await;
        assert!(snapshot.address.is_none());
        assert_eq!(snapshot.lamports, 0);
        assert!(snapshot.token_balances.is_empty());
        assert!(snapshot.refreshed_at.is_none());
        assert!(api.calls().contains(&"disconnect_wallet"));
    }

    #[tokio::test]
    async fn test_reconnect_restores_identical_balances() {
        // Stable chain snapshot: disconnect then reconnect must observe
        // the same values.
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let wallet = wallet_with(api, funded_chain());

        wallet.connect(ADDRESS).await.unwrap();
        let first = wallet.snapshot().await;

        wallet.disconnect().await.unwrap();
        wallet.connect(ADDRESS).await.unwrap();
        let second = wallet.snapshot().await;

        assert_eq!(first.lamports, second.lamports);
        assert_eq!(first.token_balances, second.token_balances);
    }

    #[tokio::test]
    async fn test_adopt_skips_backend_connect() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let wallet = wallet_with(api.clone(), funded_chain());

        wallet.adopt(ADDRESS).await;

        assert!(wallet.is_connected().await);
        assert_eq!(wallet.snapshot().await.lamports, 2_000_000_000);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_labelled_balances_use_known_symbols() {
        let api = Arc::new(MockApi::with_user(sample_user(1)));
        let chain = funded_chain();
        chain.set_token_balance("UnknownMint1111111111111111111111111111111", 3.0);
        let wallet = wallet_with(api, chain);

        wallet.adopt(ADDRESS).await;

        let balances = wallet.labelled_balances().await;
        assert!(balances.contains(&("USDC".to_string(), 42.5)));
        assert!(balances
            .iter()
            .any(|(label, _)| label == "UnknownMint1111111111111111111111111111111"));
    }
}
