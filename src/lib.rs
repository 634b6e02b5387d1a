// src/lib.rs
pub mod airdrops;
pub mod api;
pub mod config;
pub mod error;
pub mod format;
pub mod session;
pub mod solana;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use airdrops::{AirdropManager, ClaimEligibility};
pub use api::{AirdropApi, HttpApi};
pub use config::{ClientConfig, SolanaNetwork};
pub use error::{ClientError, ClientResult};
pub use session::{SessionManager, SessionState, SignOutReason};
pub use solana::{ChainClient, SolanaRpc};
pub use types::*;
pub use wallet::WalletManager;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::session::{FileTokenStore, MemoryTokenStore, SessionHandle, TokenStore};

/// MochiDrop platform client: session, wallet and airdrop stores composed
/// over one API transport.
#[derive(Clone)]
pub struct MochiClient {
    api: Arc<dyn AirdropApi>,
    chain: Arc<dyn ChainClient>,
    session: SessionManager,
    wallet: WalletManager,
    airdrops: AirdropManager,
}

impl MochiClient {
    /// Wire up a client against the configured backend and RPC endpoint.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let store: Box<dyn TokenStore> = match &config.token_path {
            Some(path) => Box::new(FileTokenStore::new(path.clone())),
            None => Box::new(MemoryTokenStore::new()),
        };
        let handle = SessionHandle::new(store);
        let api: Arc<dyn AirdropApi> = Arc::new(HttpApi::new(&config, handle.clone())?);
        let chain: Arc<dyn ChainClient> = Arc::new(SolanaRpc::new(&config)?);
        Ok(Self::assemble(api, chain, handle))
    }

    fn assemble(
        api: Arc<dyn AirdropApi>,
        chain: Arc<dyn ChainClient>,
        handle: SessionHandle,
    ) -> Self {
        let session = SessionManager::new(api.clone(), handle.clone());
        let wallet = WalletManager::new(api.clone(), chain.clone());
        let airdrops = AirdropManager::new(api.clone(), handle, wallet.clone());
        Self {
            api,
            chain,
            session,
            wallet,
            airdrops,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn wallet(&self) -> &WalletManager {
        &self.wallet
    }

    pub fn airdrops(&self) -> &AirdropManager {
        &self.airdrops
    }

    /// Session transitions, including forced sign-outs on a 401 from any
    /// call. Subscribe once at startup and route the user on changes.
    pub fn session_events(&self) -> watch::Receiver<SessionState> {
        self.session.handle().subscribe()
    }

    /// Startup: exchange the persisted token for a verified user, then run
    /// the post-sign-in sequence. Returns the restored user, if any.
    pub async fn start(&self) -> ClientResult<Option<User>> {
        match self.session.restore().await? {
            Some(user) => {
                info!("Session restored for user {}", user.id);
                self.after_sign_in(&user).await;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub async fn login(&self, credentials: Credentials) -> ClientResult<User> {
        let user = self.session.login(credentials).await?;
        self.after_sign_in(&user).await;
        Ok(user)
    }

    pub async fn register(&self, registration: Registration) -> ClientResult<User> {
        let user = self.session.register(registration).await?;
        self.after_sign_in(&user).await;
        Ok(user)
    }

    /// Adopt the profile's wallet address and populate the airdrop caches.
    /// Fetch failures are logged; the session itself stands.
    async fn after_sign_in(&self, user: &User) {
        if let Some(address) = &user.wallet_address {
            self.wallet.adopt(address).await;
        }
        if let Err(e) = self.airdrops.refresh_all().await {
            warn!("Initial cache refresh failed: {}", e);
        }
    }

    /// Probe the backend and the RPC endpoint.
    pub async fn health_check(&self) -> ClientResult<()> {
        self.api.stats().await?;
        self.chain
            .lamport_balance(solana::SYSTEM_PROGRAM_ID)
            .await?;
        Ok(())
    }
}
