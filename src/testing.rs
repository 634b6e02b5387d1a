// src/testing.rs
//
// Shared test doubles: a scripted backend and a fixed-snapshot chain.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{AirdropApi, AuthPayload};
use crate::error::{ClientError, ClientResult};
use crate::solana::ChainClient;
use crate::types::{
    AdminStats, Airdrop, AirdropDraft, AirdropPatch, AirdropStatus, Claim, ClaimStatus,
    Credentials, PlatformStats, ProfileUpdate, Registration, Session, User, UserRole,
};

pub(crate) const TEST_TOKEN: &str = "tok_test";

pub(crate) fn sample_user(id: u64) -> User {
    User {
        id,
        email: "mochi@example.com".to_string(),
        username: "mochi".to_string(),
        role: UserRole::Receiver,
        wallet_address: None,
        created_at: None,
    }
}

pub(crate) fn sample_session(user_id: u64) -> Session {
    Session {
        token: TEST_TOKEN.to_string(),
        user: sample_user(user_id),
    }
}

pub(crate) fn sample_airdrop(id: u64, status: AirdropStatus) -> Airdrop {
    Airdrop {
        id,
        name: format!("Test Drop {}", id),
        description: "A drop for testing".to_string(),
        token_mint: "So11111111111111111111111111111111111111112".to_string(),
        token_symbol: "MOCHI".to_string(),
        token_decimals: 9,
        amount_per_claim: 1_000_000_000,
        total_amount: 100_000_000_000,
        max_claims: None,
        current_claims: 0,
        status,
        end_date: None,
        created_at: None,
    }
}

pub(crate) fn sample_claim(id: u64, airdrop_id: u64) -> Claim {
    Claim {
        id,
        airdrop_id,
        amount: 1_000_000_000,
        token_symbol: "MOCHI".to_string(),
        status: ClaimStatus::Completed,
        claimed_at: chrono::Utc::now(),
        transaction_signature: None,
    }
}

/// Scripted stand-in for the platform backend. Successful claims mutate
/// the held lists the way the real backend would, so follow-up fetches
/// observe the change.
#[derive(Default)]
pub(crate) struct MockApi {
    calls: Mutex<Vec<&'static str>>,
    pub user: Mutex<Option<User>>,
    pub users: Mutex<Vec<User>>,
    pub airdrops: Mutex<Vec<Airdrop>>,
    pub claims: Mutex<Vec<Claim>>,
    pub stats: Mutex<PlatformStats>,
    pub auth_error: Mutex<Option<String>>,
    pub connect_error: Mutex<Option<String>>,
    pub disconnect_error: Mutex<Option<String>>,
    pub claim_error: Mutex<Option<String>>,
    pub profile_result: Mutex<Option<User>>,
}

impl MockApi {
    pub fn with_user(user: User) -> Self {
        let api = Self::default();
        *api.user.lock().unwrap() = Some(user);
        api
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn push_airdrop(&self, airdrop: Airdrop) {
        self.airdrops.lock().unwrap().push(airdrop);
    }

    pub fn push_claim(&self, claim: Claim) {
        self.claims.lock().unwrap().push(claim);
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn fixture_user(&self) -> User {
        self.user
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| sample_user(1))
    }

    fn auth_payload(&self) -> ClientResult<AuthPayload> {
        if let Some(message) = self.auth_error.lock().unwrap().clone() {
            return Err(ClientError::Api {
                status: 400,
                message,
            });
        }
        Ok(AuthPayload {
            user: self.fixture_user(),
            token: TEST_TOKEN.to_string(),
        })
    }

    fn rejection(slot: &Mutex<Option<String>>) -> Option<ClientError> {
        slot.lock().unwrap().clone().map(|message| ClientError::Api {
            status: 400,
            message,
        })
    }
}

#[async_trait]
impl AirdropApi for MockApi {
    async fn login(&self, _credentials: &Credentials) -> ClientResult<AuthPayload> {
        self.record("login");
        self.auth_payload()
    }

    async fn register(&self, _registration: &Registration) -> ClientResult<AuthPayload> {
        self.record("register");
        self.auth_payload()
    }

    async fn verify_token(&self, _token: &str) -> ClientResult<User> {
        self.record("verify_token");
        if let Some(message) = self.auth_error.lock().unwrap().clone() {
            return Err(ClientError::Api {
                status: 401,
                message,
            });
        }
        Ok(self.fixture_user())
    }

    async fn update_profile(&self, _update: &ProfileUpdate) -> ClientResult<User> {
        self.record("update_profile");
        Ok(self
            .profile_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| self.fixture_user()))
    }

    async fn connect_wallet(&self, _address: &str) -> ClientResult<()> {
        self.record("connect_wallet");
        match Self::rejection(&self.connect_error) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn disconnect_wallet(&self) -> ClientResult<()> {
        self.record("disconnect_wallet");
        match Self::rejection(&self.disconnect_error) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn active_airdrops(&self) -> ClientResult<Vec<Airdrop>> {
        self.record("active_airdrops");
        Ok(self.airdrops.lock().unwrap().clone())
    }

    async fn airdrop(&self, id: u64) -> ClientResult<Airdrop> {
        self.record("airdrop");
        self.airdrops
            .lock()
            .unwrap()
            .iter()
            .find(|airdrop| airdrop.id == id)
            .cloned()
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "Airdrop not found".to_string(),
            })
    }

    async fn claim_airdrop(&self, id: u64) -> ClientResult<Claim> {
        self.record("claim_airdrop");
        if let Some(err) = Self::rejection(&self.claim_error) {
            return Err(err);
        }

        let claim = {
            let mut claims = self.claims.lock().unwrap();
            let claim = sample_claim(claims.len() as u64 + 1, id);
            claims.push(claim.clone());
            claim
        };
        if let Some(airdrop) = self
            .airdrops
            .lock()
            .unwrap()
            .iter_mut()
            .find(|airdrop| airdrop.id == id)
        {
            airdrop.current_claims += 1;
        }
        Ok(claim)
    }

    async fn user_claims(&self) -> ClientResult<Vec<Claim>> {
        self.record("user_claims");
        Ok(self.claims.lock().unwrap().clone())
    }

    async fn stats(&self) -> ClientResult<PlatformStats> {
        self.record("stats");
        Ok(self.stats.lock().unwrap().clone())
    }

    async fn create_airdrop(&self, draft: &AirdropDraft) -> ClientResult<Airdrop> {
        self.record("create_airdrop");
        let airdrop = {
            let mut airdrops = self.airdrops.lock().unwrap();
            let airdrop = Airdrop {
                id: airdrops.len() as u64 + 1,
                name: draft.name.clone(),
                description: draft.description.clone(),
                token_mint: draft.token_mint.clone(),
                token_symbol: draft.token_symbol.clone(),
                token_decimals: draft.token_decimals,
                amount_per_claim: draft.amount_per_claim,
                total_amount: draft.total_amount,
                max_claims: draft.max_claims,
                current_claims: 0,
                status: AirdropStatus::Active,
                end_date: draft.end_date,
                created_at: None,
            };
            airdrops.push(airdrop.clone());
            airdrop
        };
        Ok(airdrop)
    }

    async fn update_airdrop(&self, id: u64, patch: &AirdropPatch) -> ClientResult<Airdrop> {
        self.record("update_airdrop");
        let mut airdrops = self.airdrops.lock().unwrap();
        let airdrop = airdrops
            .iter_mut()
            .find(|airdrop| airdrop.id == id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: "Airdrop not found".to_string(),
            })?;
        if let Some(name) = &patch.name {
            airdrop.name = name.clone();
        }
        if let Some(description) = &patch.description {
            airdrop.description = description.clone();
        }
        if let Some(status) = patch.status {
            airdrop.status = status;
        }
        if let Some(max_claims) = patch.max_claims {
            airdrop.max_claims = Some(max_claims);
        }
        if let Some(end_date) = patch.end_date {
            airdrop.end_date = Some(end_date);
        }
        Ok(airdrop.clone())
    }

    async fn admin_stats(&self) -> ClientResult<AdminStats> {
        self.record("admin_stats");
        Ok(serde_json::json!({ "total_users": 0 }))
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("list_users");
        Ok(self.users.lock().unwrap().clone())
    }
}

/// Fixed chain snapshot: stable balances until a test changes them.
pub(crate) struct MockChain {
    lamports: Mutex<u64>,
    tokens: Mutex<HashMap<String, f64>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockChain {
    pub fn new(lamports: u64) -> Self {
        Self {
            lamports: Mutex::new(lamports),
            tokens: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_token_balance(&self, mint: &str, amount: f64) {
        self.tokens.lock().unwrap().insert(mint.to_string(), amount);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn query(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            Err(ClientError::Rpc("rpc unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn lamport_balance(&self, _address: &str) -> ClientResult<u64> {
        self.query()?;
        Ok(*self.lamports.lock().unwrap())
    }

    async fn token_balances(&self, _address: &str) -> ClientResult<HashMap<String, f64>> {
        self.query()?;
        Ok(self.tokens.lock().unwrap().clone())
    }
}
