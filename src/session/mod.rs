// src/session/mod.rs
pub mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::api::AirdropApi;
use crate::error::{ClientError, ClientResult};
use crate::solana::is_valid_address;
use crate::types::{Credentials, ProfileUpdate, Registration, Session, User};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignOutReason {
    /// No session has been established yet.
    Startup,
    /// The user signed out.
    Logout,
    /// The backend rejected the token; the session was force-cleared.
    Unauthorized,
}

/// Broadcast on every session transition. The embedding application
/// subscribes and routes the user accordingly (e.g. back to a login view
/// on `Anonymous { reason: Unauthorized }`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous { reason: SignOutReason },
    Authenticated { user_id: u64 },
}

struct SessionShared {
    current: RwLock<Option<Session>>,
    store: Box<dyn TokenStore>,
    events: watch::Sender<SessionState>,
}

/// Shared authority over the current session. The HTTP transport reads the
/// token from here and calls [`invalidate`](SessionHandle::invalidate) on a
/// 401; everything else goes through [`SessionManager`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<SessionShared>,
}

impl SessionHandle {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let (events, _) = watch::channel(SessionState::Anonymous {
            reason: SignOutReason::Startup,
        });
        Self {
            inner: Arc::new(SessionShared {
                current: RwLock::new(None),
                store,
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.events.subscribe()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .await
            .as_ref()
            .map(|session| session.token.clone())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.inner
            .current
            .read()
            .await
            .as_ref()
            .map(|session| session.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.current.read().await.is_some()
    }

    /// Force-clear the session after an unauthorized response. Concurrent
    /// callers collapse to a single sign-out; only the caller that actually
    /// cleared the session sees `true`.
    pub async fn invalidate(&self) -> bool {
        self.clear(SignOutReason::Unauthorized).await
    }

    pub(crate) async fn establish(&self, session: Session) -> ClientResult<()> {
        self.inner.store.save(&session.token)?;
        let user_id = session.user.id;
        *self.inner.current.write().await = Some(session);
        self.inner
            .events
            .send_replace(SessionState::Authenticated { user_id });
        Ok(())
    }

    pub(crate) async fn clear(&self, reason: SignOutReason) -> bool {
        let previous = self.inner.current.write().await.take();
        if previous.is_none() {
            return false;
        }
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to clear persisted token: {}", e);
        }
        self.inner
            .events
            .send_replace(SessionState::Anonymous { reason });
        true
    }

    pub(crate) async fn replace_user(&self, user: User) {
        if let Some(session) = self.inner.current.write().await.as_mut() {
            session.user = user;
        }
    }

    pub(crate) fn load_persisted(&self) -> ClientResult<Option<String>> {
        self.inner.store.load()
    }

    pub(crate) fn discard_persisted(&self) {
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to discard persisted token: {}", e);
        }
    }
}

/// Authentication operations against the platform API.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<dyn AirdropApi>,
    handle: SessionHandle,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AirdropApi>, handle: SessionHandle) -> Self {
        Self { api, handle }
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub async fn is_authenticated(&self) -> bool {
        self.handle.is_authenticated().await
    }

    pub async fn current_user(&self) -> Option<User> {
        self.handle.current_user().await
    }

    /// Exchange credentials for a session. On success the token is
    /// persisted and the identity is visible synchronously with the return.
    pub async fn login(&self, credentials: Credentials) -> ClientResult<User> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(ClientError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let payload = self.api.login(&credentials).await?;
        let user = payload.user.clone();
        self.handle
            .establish(Session {
                token: payload.token,
                user: payload.user,
            })
            .await?;
        Ok(user)
    }

    pub async fn register(&self, registration: Registration) -> ClientResult<User> {
        validate_registration(&registration)?;

        let payload = self.api.register(&registration).await?;
        let user = payload.user.clone();
        self.handle
            .establish(Session {
                token: payload.token,
                user: payload.user,
            })
            .await?;
        Ok(user)
    }

    /// Always succeeds; the session is gone when this returns.
    pub async fn logout(&self) {
        if !self.handle.clear(SignOutReason::Logout).await {
            debug!("Logout with no active session");
        }
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<User> {
        if let Some(address) = &update.wallet_address {
            if !is_valid_address(address) {
                return Err(ClientError::InvalidAddress(address.clone()));
            }
        }
        let user = self.api.update_profile(&update).await?;
        self.handle.replace_user(user.clone()).await;
        Ok(user)
    }

    /// Startup check: exchange the persisted token for a verified user.
    /// A rejected token is discarded; the caller just starts anonymous.
    pub async fn restore(&self) -> ClientResult<Option<User>> {
        let Some(token) = self.handle.load_persisted()? else {
            return Ok(None);
        };

        match self.api.verify_token(&token).await {
            Ok(user) => {
                self.handle
                    .establish(Session {
                        token,
                        user: user.clone(),
                    })
                    .await?;
                Ok(Some(user))
            }
            Err(e) => {
                debug!("Persisted token rejected: {}", e);
                self.handle.discard_persisted();
                Ok(None)
            }
        }
    }
}

fn validate_registration(registration: &Registration) -> ClientResult<()> {
    if !is_valid_email(&registration.email) {
        return Err(ClientError::Validation("Invalid email address".to_string()));
    }
    if registration.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    let username_len = registration.username.chars().count();
    if username_len < MIN_USERNAME_LENGTH || username_len > MAX_USERNAME_LENGTH {
        return Err(ClientError::Validation(format!(
            "Username must be {} to {} characters",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }
    if let Some(address) = &registration.wallet_address {
        if !is_valid_address(address) {
            return Err(ClientError::InvalidAddress(address.clone()));
        }
    }
    Ok(())
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
