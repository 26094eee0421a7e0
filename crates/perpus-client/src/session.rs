//! # Session Store
//!
//! Holds the bearer token and the user, persists them in the session cache,
//! and exposes the authentication calls.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   restore(cache) ──► empty ──login/register──► authenticated            │
//! │                        ▲                          │    ▲                │
//! │                        │                          │    │ refresh_identity│
//! │                        └────────── logout ────────┘    │ update_profile │
//! │                                                   └────┘ (token kept)   │
//! │                                                                         │
//! │   Cache: "token" + "user" written together, removed together           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed call leaves token and user as they were; only `status().errors`
//! changes. The navigation guard reads [`SessionStore::snapshot`], so it sees
//! whatever the last settled operation committed.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use perpus_core::{Credentials, ProfileUpdate, Registration, Session, User};

use crate::cache::{KeyValueCache, TOKEN_KEY, USER_KEY};
use crate::error::{ClientError, ClientResult};
use crate::events::{NoOpObserver, StoreObserver};
use crate::http::{Acknowledgement, ApiClient, AuthResponse, RequestBody, UserEnvelope};
use crate::status::{StatusTracker, StoreStatus};

const STORE_NAME: &str = "session";

struct Inner {
    api: ApiClient,
    cache: Arc<dyn KeyValueCache>,
    session: RwLock<Session>,
    tracker: StatusTracker,
}

/// Shared handle to the session. Clones see the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Rehydrates the session from the cache.
    pub fn restore(api: ApiClient, cache: Arc<dyn KeyValueCache>) -> Self {
        Self::restore_with_observer(api, cache, Arc::new(NoOpObserver))
    }

    /// Rehydrates the session, reporting state changes to `observer`.
    pub fn restore_with_observer(
        api: ApiClient,
        cache: Arc<dyn KeyValueCache>,
        observer: Arc<dyn StoreObserver>,
    ) -> Self {
        let session = read_cached(cache.as_ref());
        if session.is_authenticated() {
            info!(role = session.role_name().unwrap_or("-"), "Session restored from cache");
        }

        SessionStore {
            inner: Arc::new(Inner {
                api,
                cache,
                session: RwLock::new(session),
                tracker: StatusTracker::new(STORE_NAME, observer),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the committed session, as the navigation guard consumes it.
    pub async fn snapshot(&self) -> Session {
        self.inner.session.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.session.read().await.token().map(str::to_string)
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.session.read().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.read().await.is_authenticated()
    }

    pub async fn status(&self) -> StoreStatus {
        self.inner.tracker.snapshot().await
    }

    /// The HTTP client this session authenticates against.
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        self.inner
            .tracker
            .track("login", async {
                let body = RequestBody::json(credentials)?;
                let response: AuthResponse = self.inner.api.post("/auth/login", None, body).await?;
                Ok(self.sign_in(response).await)
            })
            .await
    }

    /// `POST /auth/register`. A new account is signed in straight away.
    pub async fn register(&self, registration: &Registration) -> ClientResult<Session> {
        self.inner
            .tracker
            .track("register", async {
                let body = RequestBody::json(registration)?;
                let response: AuthResponse =
                    self.inner.api.post("/auth/register", None, body).await?;
                Ok(self.sign_in(response).await)
            })
            .await
    }

    /// `POST /auth/logout`, then forgets token and user.
    ///
    /// Logging out an empty session succeeds without a request.
    pub async fn logout(&self) -> ClientResult<()> {
        let Some(token) = self.token().await else {
            debug!("Logout without a session");
            self.clear().await;
            return Ok(());
        };

        self.inner
            .tracker
            .track("logout", async {
                let _: Option<Acknowledgement> = self
                    .inner
                    .api
                    .post("/auth/logout", Some(&token), RequestBody::Json(json!({})))
                    .await?;
                self.clear().await;
                info!("Logged out");
                Ok(())
            })
            .await
    }

    /// `GET /me`. Replaces the user, keeps the token.
    pub async fn refresh_identity(&self) -> ClientResult<Session> {
        let token = self.token().await.ok_or(ClientError::NotAuthenticated)?;

        self.inner
            .tracker
            .track("refresh_identity", async {
                let response: UserEnvelope = self.inner.api.get("/me", Some(&token)).await?;
                self.replace_user(&token, response.user).await
            })
            .await
    }

    /// `POST /profile`. Replaces the user, keeps the token.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Session> {
        let token = self.token().await.ok_or(ClientError::NotAuthenticated)?;

        self.inner
            .tracker
            .track("update_profile", async {
                let body = RequestBody::json(update)?;
                let response: UserEnvelope =
                    self.inner.api.post("/profile", Some(&token), body).await?;
                self.replace_user(&token, response.user).await
            })
            .await
    }

    // =========================================================================
    // State Transitions
    // =========================================================================

    async fn sign_in(&self, response: AuthResponse) -> Session {
        let session = Session::authenticated(response.token, response.user);
        self.commit(session.clone()).await;
        info!(
            role = session.role_name().unwrap_or("-"),
            "Signed in"
        );
        session
    }

    /// Swaps the user of the session `token` belongs to.
    async fn replace_user(&self, token: &str, user: User) -> ClientResult<Session> {
        let current = self.snapshot().await;
        if current.token() != Some(token) {
            // Logged out or re-authenticated while the request was in flight.
            warn!("Session changed during identity update, discarding response");
            return Err(ClientError::NotAuthenticated);
        }
        let session = current.with_user(user);
        self.commit(session.clone()).await;
        Ok(session)
    }

    async fn commit(&self, session: Session) {
        if let Err(e) = persist(self.inner.cache.as_ref(), &session) {
            // A partial write must not survive a restart.
            warn!(error = %e, "Failed to persist session, evicting cache and continuing in memory");
            evict(self.inner.cache.as_ref());
        }
        *self.inner.session.write().await = session;
    }

    async fn clear(&self) {
        evict(self.inner.cache.as_ref());
        *self.inner.session.write().await = Session::empty();
    }
}

// =============================================================================
// Cache Helpers
// =============================================================================

fn read_cached(cache: &dyn KeyValueCache) -> Session {
    let token = cache.get(TOKEN_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "Unreadable cached token");
        None
    });
    let raw_user = cache.get(USER_KEY).unwrap_or_else(|e| {
        warn!(error = %e, "Unreadable cached user");
        None
    });

    let user = match raw_user.map(|raw| serde_json::from_str::<User>(&raw)) {
        Some(Ok(user)) => Some(user),
        Some(Err(e)) => {
            warn!(error = %e, "Discarding corrupt cached user");
            evict(cache);
            return Session::empty();
        }
        None => None,
    };

    match Session::from_parts(token, user) {
        Some(session) => session,
        None => {
            warn!("Discarding half-populated session cache");
            evict(cache);
            Session::empty()
        }
    }
}

fn persist(cache: &dyn KeyValueCache, session: &Session) -> ClientResult<()> {
    match (session.token(), session.user()) {
        (Some(token), Some(user)) => {
            let user = serde_json::to_string(user)?;
            // Drop the previous user first so an interrupted write leaves a
            // lone token, which restore discards.
            cache.remove(USER_KEY)?;
            cache.set(TOKEN_KEY, token)?;
            cache.set(USER_KEY, &user)?;
        }
        _ => {
            cache.remove(TOKEN_KEY)?;
            cache.remove(USER_KEY)?;
        }
    }
    Ok(())
}

fn evict(cache: &dyn KeyValueCache) {
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(e) = cache.remove(key) {
            warn!(key, error = %e, "Failed to evict cache entry");
        }
    }
}
