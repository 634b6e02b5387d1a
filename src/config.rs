// src/config.rs
use std::path::PathBuf;
use std::time::Duration;

/// Target Solana cluster. Picks the public RPC endpoint unless one is
/// configured explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolanaNetwork {
    Mainnet,
    Devnet,
    Testnet,
}

impl SolanaNetwork {
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            SolanaNetwork::Mainnet => "https://api.mainnet-beta.solana.com",
            SolanaNetwork::Devnet => "https://api.devnet.solana.com",
            SolanaNetwork::Testnet => "https://api.testnet.solana.com",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the platform REST API, without a trailing slash.
    pub api_base_url: String,
    pub rpc_url: String,
    pub commitment: String,
    pub request_timeout: Duration,
    /// Durable slot for the session token. In-memory when unset.
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            rpc_url: SolanaNetwork::Devnet.default_rpc_url().to_string(),
            commitment: "confirmed".to_string(),
            request_timeout: Duration::from_secs(30),
            token_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Default configuration with environment overrides applied:
    /// `MOCHIDROP_API_URL`, `SOLANA_RPC_URL`, `MOCHIDROP_TOKEN_PATH`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("MOCHIDROP_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("SOLANA_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(path) = std::env::var("MOCHIDROP_TOKEN_PATH") {
            config.token_path = Some(PathBuf::from(path));
        }
        config
    }

    pub fn with_network(mut self, network: SolanaNetwork) -> Self {
        self.rpc_url = network.default_rpc_url().to_string();
        self
    }

    pub fn with_rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}
