// src/airdrops/mod.rs
use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::api::AirdropApi;
use crate::error::ClientResult;
use crate::session::SessionHandle;
use crate::types::{
    AdminStats, Airdrop, AirdropDraft, AirdropPatch, Claim, PlatformStats, User,
};
use crate::wallet::WalletManager;

/// Why a claim is (or is not) available right now. Advisory only — the
/// backend is the authority and may still reject a claim the client
/// believed eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimEligibility {
    Claimable,
    /// The airdrop is not in active status.
    Ended,
    /// Every claim slot is taken, whatever the viewer's own state.
    Exhausted,
    LoginRequired,
    WalletRequired,
    AlreadyClaimed,
}

impl ClaimEligibility {
    pub fn is_claimable(&self) -> bool {
        matches!(self, ClaimEligibility::Claimable)
    }
}

impl fmt::Display for ClaimEligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClaimEligibility::Claimable => "claimable",
            ClaimEligibility::Ended => "airdrop ended",
            ClaimEligibility::Exhausted => "not available",
            ClaimEligibility::LoginRequired => "login required",
            ClaimEligibility::WalletRequired => "wallet connection required",
            ClaimEligibility::AlreadyClaimed => "already claimed",
        };
        f.write_str(label)
    }
}

/// Airdrop store: cached campaign list, the caller's claim records, and
/// platform stats. Caches change only by refetching; a mutating call never
/// edits them optimistically.
#[derive(Clone)]
pub struct AirdropManager {
    api: Arc<dyn AirdropApi>,
    session: SessionHandle,
    wallet: WalletManager,
    airdrops: Arc<RwLock<Vec<Airdrop>>>,
    claims: Arc<RwLock<Vec<Claim>>>,
    stats: Arc<RwLock<PlatformStats>>,
}

impl AirdropManager {
    pub fn new(api: Arc<dyn AirdropApi>, session: SessionHandle, wallet: WalletManager) -> Self {
        Self {
            api,
            session,
            wallet,
            airdrops: Arc::new(RwLock::new(Vec::new())),
            claims: Arc::new(RwLock::new(Vec::new())),
            stats: Arc::new(RwLock::new(PlatformStats::default())),
        }
    }

    pub async fn airdrops(&self) -> Vec<Airdrop> {
        self.airdrops.read().await.clone()
    }

    pub async fn claims(&self) -> Vec<Claim> {
        self.claims.read().await.clone()
    }

    pub async fn stats(&self) -> PlatformStats {
        self.stats.read().await.clone()
    }

    pub async fn refresh_airdrops(&self) -> ClientResult<()> {
        let list = self.api.active_airdrops().await?;
        *self.airdrops.write().await = list;
        Ok(())
    }

    pub async fn refresh_claims(&self) -> ClientResult<()> {
        let list = self.api.user_claims().await?;
        *self.claims.write().await = list;
        Ok(())
    }

    pub async fn refresh_stats(&self) -> ClientResult<()> {
        let stats = self.api.stats().await?;
        *self.stats.write().await = stats;
        Ok(())
    }

    /// Refresh all three caches. Every fetch is attempted; the first
    /// failure is reported after the rest have run.
    pub async fn refresh_all(&self) -> ClientResult<()> {
        let mut first_error = None;
        for result in [
            self.refresh_airdrops().await,
            self.refresh_claims().await,
            self.refresh_stats().await,
        ] {
            if let Err(e) = result {
                warn!("Cache refresh failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Fetch a single airdrop directly; does not touch the cached list.
    pub async fn fetch_airdrop(&self, id: u64) -> ClientResult<Airdrop> {
        self.api.airdrop(id).await
    }

    /// Claim one allocation from an airdrop. Exactly one claim request is
    /// issued; on success the claims and airdrop lists are refetched (in
    /// that order) so the caches reflect the backend. On failure every
    /// cache is left untouched and the backend's message comes back
    /// verbatim. Concurrent submissions are not deduplicated here;
    /// at-most-once is the backend's contract.
    pub async fn claim(&self, airdrop_id: u64) -> ClientResult<Claim> {
        let claim = self.api.claim_airdrop(airdrop_id).await?;

        if let Err(e) = self.refresh_claims().await {
            warn!("Claim list refresh after claim failed: {}", e);
        }
        if let Err(e) = self.refresh_airdrops().await {
            warn!("Airdrop list refresh after claim failed: {}", e);
        }
        Ok(claim)
    }

    /// Admin: create an airdrop. The campaign list is refetched on success.
    pub async fn create_airdrop(&self, draft: AirdropDraft) -> ClientResult<Airdrop> {
        let airdrop = self.api.create_airdrop(&draft).await?;
        if let Err(e) = self.refresh_airdrops().await {
            warn!("Airdrop list refresh after create failed: {}", e);
        }
        Ok(airdrop)
    }

    /// Admin: update an airdrop. The campaign list is refetched on success.
    pub async fn update_airdrop(&self, id: u64, patch: AirdropPatch) -> ClientResult<Airdrop> {
        let airdrop = self.api.update_airdrop(id, &patch).await?;
        if let Err(e) = self.refresh_airdrops().await {
            warn!("Airdrop list refresh after update failed: {}", e);
        }
        Ok(airdrop)
    }

    pub async fn admin_stats(&self) -> ClientResult<AdminStats> {
        self.api.admin_stats().await
    }

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.api.list_users().await
    }

    pub async fn airdrop_by_id(&self, id: u64) -> Option<Airdrop> {
        self.airdrops
            .read()
            .await
            .iter()
            .find(|airdrop| airdrop.id == id)
            .cloned()
    }

    /// The caller's claim for an airdrop, if the cache holds one. Linear
    /// scan; per-user uniqueness is a backend invariant.
    pub async fn claim_for_airdrop(&self, airdrop_id: u64) -> Option<Claim> {
        self.claims
            .read()
            .await
            .iter()
            .find(|claim| claim.airdrop_id == airdrop_id)
            .cloned()
    }

    /// Evaluate the claim gate for an airdrop against the current session,
    /// wallet, and claim caches. Computed at read time, never stored.
    pub async fn claim_eligibility(&self, airdrop: &Airdrop) -> ClaimEligibility {
        if !airdrop.is_active() {
            return ClaimEligibility::Ended;
        }
        if airdrop.is_exhausted() {
            return ClaimEligibility::Exhausted;
        }
        if !self.session.is_authenticated().await {
            return ClaimEligibility::LoginRequired;
        }
        if !self.wallet.is_connected().await {
            return ClaimEligibility::WalletRequired;
        }
        if self.claim_for_airdrop(airdrop.id).await.is_some() {
            return ClaimEligibility::AlreadyClaimed;
        }
        ClaimEligibility::Claimable
    }
}
