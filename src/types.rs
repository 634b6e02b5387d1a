// src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::solana::LAMPORTS_PER_SOL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Receiver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Authenticated identity plus the bearer token backing it.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AirdropStatus {
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airdrop {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub token_mint: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    // Raw token units; divide by 10^token_decimals for display
    pub amount_per_claim: u64,
    pub total_amount: u64,
    #[serde(default)]
    pub max_claims: Option<u64>,
    #[serde(default)]
    pub current_claims: u64,
    pub status: AirdropStatus,
    #[serde(default)]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Airdrop {
    pub fn is_active(&self) -> bool {
        self.status == AirdropStatus::Active
    }

    /// All claim slots taken. Unlimited when max_claims is unset.
    pub fn is_exhausted(&self) -> bool {
        self.max_claims
            .map(|max| self.current_claims >= max)
            .unwrap_or(false)
    }

    pub fn remaining_claims(&self) -> Option<u64> {
        self.max_claims
            .map(|max| max.saturating_sub(self.current_claims))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub airdrop_id: u64,
    pub amount: u64,
    pub token_symbol: String,
    pub status: ClaimStatus,
    pub claimed_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub transaction_signature: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    #[serde(default)]
    pub total_airdrops: u64,
    #[serde(default)]
    pub active_airdrops: u64,
    #[serde(default)]
    pub total_claims: u64,
    #[serde(default)]
    pub total_distributed: u64,
}

/// Shape of `GET /admin/stats` is backend-defined; forwarded as-is.
pub type AdminStats = serde_json::Value;

/// Cached view of the connected wallet. Cleared entirely on disconnect.
#[derive(Debug, Clone, Default)]
pub struct WalletSnapshot {
    pub address: Option<String>,
    pub lamports: u64,
    // mint address -> ui amount, positive balances only
    pub token_balances: HashMap<String, f64>,
    pub refreshed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl WalletSnapshot {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn sol(&self) -> f64 {
        self.lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AirdropDraft {
    pub name: String,
    pub description: String,
    pub token_mint: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub amount_per_claim: u64,
    pub total_amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_claims: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AirdropPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AirdropStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_claims: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
}
