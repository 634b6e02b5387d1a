// src/api/http.rs
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::api::{
    AirdropApi, AirdropListEnvelope, AirdropOutcome, AuthPayload, ClaimListEnvelope,
    ClaimOutcome, OutcomeEnvelope, StatsEnvelope, UserListEnvelope,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, GENERIC_ERROR};
use crate::session::SessionHandle;
use crate::types::{
    AdminStats, Airdrop, AirdropDraft, AirdropPatch, Claim, Credentials, PlatformStats,
    ProfileUpdate, Registration, User,
};

/// HTTP transport for the platform API. Every request passes through one
/// stage: the current bearer token is attached when present, and any 401
/// response routes through [`SessionHandle::invalidate`] before the error
/// reaches the caller.
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpApi {
    pub fn new(config: &ClientConfig, session: SessionHandle) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            if self.session.invalidate().await {
                warn!("Session invalidated by unauthorized response");
            }
            return Err(ClientError::Unauthorized);
        }

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.authorized(self.http.get(self.url(path))).await;
        self.execute(builder).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self
            .authorized(self.http.post(self.url(path)).json(body))
            .await;
        self.execute(builder).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.authorized(self.http.post(self.url(path))).await;
        self.execute(builder).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self
            .authorized(self.http.put(self.url(path)).json(body))
            .await;
        self.execute(builder).await
    }
}

#[async_trait]
impl AirdropApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> ClientResult<AuthPayload> {
        self.post("/auth/login", credentials).await
    }

    async fn register(&self, registration: &Registration) -> ClientResult<AuthPayload> {
        self.post("/auth/register", registration).await
    }

    async fn verify_token(&self, token: &str) -> ClientResult<User> {
        // Explicit token; the session slot may be empty during startup
        let builder = self.http.get(self.url("/auth/verify")).bearer_auth(token);
        self.execute(builder).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        self.put("/auth/profile", update).await
    }

    async fn connect_wallet(&self, address: &str) -> ClientResult<()> {
        let outcome: OutcomeEnvelope = self
            .post("/wallet/connect", &serde_json::json!({ "address": address }))
            .await?;
        unwrap_outcome(outcome.success, outcome.error, ())
    }

    async fn disconnect_wallet(&self) -> ClientResult<()> {
        let outcome: OutcomeEnvelope = self.post_empty("/wallet/disconnect").await?;
        unwrap_outcome(outcome.success, outcome.error, ())
    }

    async fn active_airdrops(&self) -> ClientResult<Vec<Airdrop>> {
        let envelope: AirdropListEnvelope = self.get("/airdrops/active").await?;
        Ok(envelope.airdrops)
    }

    async fn airdrop(&self, id: u64) -> ClientResult<Airdrop> {
        self.get(&format!("/airdrops/{}", id)).await
    }

    async fn claim_airdrop(&self, id: u64) -> ClientResult<Claim> {
        let outcome: ClaimOutcome = self.post_empty(&format!("/airdrops/{}/claim", id)).await?;
        if !outcome.success {
            return Err(in_band_rejection(outcome.error));
        }
        outcome
            .claim
            .ok_or_else(|| ClientError::Decode("Claim missing from response".to_string()))
    }

    async fn user_claims(&self) -> ClientResult<Vec<Claim>> {
        let envelope: ClaimListEnvelope = self.get("/claims/user").await?;
        Ok(envelope.claims)
    }

    async fn stats(&self) -> ClientResult<PlatformStats> {
        let envelope: StatsEnvelope = self.get("/stats").await?;
        Ok(envelope.stats)
    }

    async fn create_airdrop(&self, draft: &AirdropDraft) -> ClientResult<Airdrop> {
        let outcome: AirdropOutcome = self.post("/admin/airdrops", draft).await?;
        if !outcome.success {
            return Err(in_band_rejection(outcome.error));
        }
        outcome
            .airdrop
            .ok_or_else(|| ClientError::Decode("Airdrop missing from response".to_string()))
    }

    async fn update_airdrop(&self, id: u64, patch: &AirdropPatch) -> ClientResult<Airdrop> {
        let outcome: AirdropOutcome = self.put(&format!("/admin/airdrops/{}", id), patch).await?;
        if !outcome.success {
            return Err(in_band_rejection(outcome.error));
        }
        outcome
            .airdrop
            .ok_or_else(|| ClientError::Decode("Airdrop missing from response".to_string()))
    }

    async fn admin_stats(&self) -> ClientResult<AdminStats> {
        self.get("/admin/stats").await
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        let envelope: UserListEnvelope = self.get("/admin/users").await?;
        Ok(envelope.users)
    }
}

fn unwrap_outcome<T>(success: bool, error: Option<String>, value: T) -> ClientResult<T> {
    if success {
        Ok(value)
    } else {
        Err(in_band_rejection(error))
    }
}

/// A 200 whose body reports failure; surfaced with the backend's message.
fn in_band_rejection(error: Option<String>) -> ClientError {
    ClientError::Api {
        status: 200,
        message: error.unwrap_or_else(|| GENERIC_ERROR.to_string()),
    }
}

/// Pull a display message out of a failed response body. The backend is not
/// consistent about the key it uses.
pub(crate) fn extract_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }
    GENERIC_ERROR.to_string()
}
