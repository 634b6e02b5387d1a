// src/api/mod.rs
pub mod http;

pub use http::HttpApi;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClientResult;
use crate::types::{
    AdminStats, Airdrop, AirdropDraft, AirdropPatch, Claim, Credentials, PlatformStats,
    ProfileUpdate, Registration, User,
};

/// The platform REST surface, one method per endpoint. The production
/// implementation is [`HttpApi`]; stores depend on the trait so the backend
/// can be substituted in tests.
#[async_trait]
pub trait AirdropApi: Send + Sync {
    // Auth
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthPayload>;
    async fn register(&self, registration: &Registration) -> ClientResult<AuthPayload>;
    /// Exchange a persisted token for its verified user. Sends the given
    /// token, not the current session's.
    async fn verify_token(&self, token: &str) -> ClientResult<User>;
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User>;

    // Wallet
    async fn connect_wallet(&self, address: &str) -> ClientResult<()>;
    async fn disconnect_wallet(&self) -> ClientResult<()>;

    // Airdrops
    async fn active_airdrops(&self) -> ClientResult<Vec<Airdrop>>;
    async fn airdrop(&self, id: u64) -> ClientResult<Airdrop>;
    async fn claim_airdrop(&self, id: u64) -> ClientResult<Claim>;
    async fn user_claims(&self) -> ClientResult<Vec<Claim>>;
    async fn stats(&self) -> ClientResult<PlatformStats>;

    // Admin (role-gated server-side, forwarded verbatim)
    async fn create_airdrop(&self, draft: &AirdropDraft) -> ClientResult<Airdrop>;
    async fn update_airdrop(&self, id: u64, patch: &AirdropPatch) -> ClientResult<Airdrop>;
    async fn admin_stats(&self) -> ClientResult<AdminStats>;
    async fn list_users(&self) -> ClientResult<Vec<User>>;
}

/// Login/register response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

// Wire envelopes, as the backend shapes them.

#[derive(Deserialize)]
pub(crate) struct AirdropListEnvelope {
    #[serde(default)]
    pub airdrops: Vec<Airdrop>,
}

#[derive(Deserialize)]
pub(crate) struct ClaimListEnvelope {
    #[serde(default)]
    pub claims: Vec<Claim>,
}

#[derive(Deserialize)]
pub(crate) struct StatsEnvelope {
    #[serde(default)]
    pub stats: PlatformStats,
}

#[derive(Deserialize)]
pub(crate) struct UserListEnvelope {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Mutations report success in-band even on a 200.
#[derive(Deserialize)]
pub(crate) struct OutcomeEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ClaimOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub claim: Option<Claim>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct AirdropOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub airdrop: Option<Airdrop>,
    #[serde(default)]
    pub error: Option<String>,
}
