// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The session state machine.

use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::services::{AuthBackend, UserApi};
use crate::store::{TokenStore, AUTH_TOKENS_KEY, CACHED_USER_KEY};
use crate::types::{AuthTokens, DeliveryAddress, SessionState, User};

use super::refresh;

/// Cached user record persisted alongside the moment it was last fetched,
/// so the refresh window survives a restart.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedUser {
    user: User,
    last_refresh: DateTime<Utc>,
}

struct Inner {
    state: SessionState,
    last_refresh: Option<DateTime<Utc>>,
}

/// Owns the signed-in/out state, mediates sign-in, session restoration,
/// periodic refresh, and sign-out.
///
/// One manager exists per process, constructed once at startup and passed
/// by reference to all consumers. All state transitions serialize on an
/// internal lock held for the whole operation.
pub struct SessionManager {
    inner: Mutex<Inner>,
    user_api: Arc<dyn UserApi>,
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionState>,
    refresh_interval_secs: u64,
    refresh_task: StdMutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    /// Create a manager in the `SignedOut` state.
    pub fn new(
        user_api: Arc<dyn UserApi>,
        auth: Arc<dyn AuthBackend>,
        store: Arc<dyn TokenStore>,
        config: &ClientConfig,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_buffer);
        Arc::new(Self {
            inner: Mutex::new(Inner {
                state: SessionState::SignedOut,
                last_refresh: None,
            }),
            user_api,
            auth,
            store,
            events,
            refresh_interval_secs: config.refresh_interval_secs,
            refresh_task: StdMutex::new(None),
        })
    }

    /// Subscribe to state-change events, delivered in transition order.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.events.subscribe()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Sign in as `user_id`: fetch the user record, persist a token bundle
    /// and the cached user, and start the background refresh schedule.
    ///
    /// On failure the session transitions to `SignedOut`, any persisted
    /// credentials are removed, and the error is surfaced to the caller.
    pub async fn sign_in(self: &Arc<Self>, user_id: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        self.set_state(&mut inner, SessionState::Loading);

        match self.user_api.fetch_user(user_id).await {
            Ok(user) => {
                let tokens = self.auth.issue_tokens(&user.id);
                if let Err(err) = self.persist_tokens(&tokens) {
                    self.purge_persisted();
                    self.set_state(&mut inner, SessionState::SignedOut);
                    return Err(err.into());
                }

                let now = Utc::now();
                self.cache_user(&user, now);
                inner.last_refresh = Some(now);
                self.set_state(&mut inner, SessionState::SignedIn(user));
                self.start_refresh_task();
                info!(user_id, "signed in");
                Ok(())
            }
            Err(err) => {
                self.purge_persisted();
                self.set_state(&mut inner, SessionState::SignedOut);
                warn!(user_id, error = %err, "sign-in failed");
                Err(err.into())
            }
        }
    }

    /// Restore a previous session from persisted credentials. Invoked once
    /// at process start.
    ///
    /// With no persisted bundle the session stays `SignedOut`. An expired
    /// bundle triggers a token refresh attempt; a failed refresh purges
    /// the persisted state and signs out. A valid bundle re-hydrates the
    /// user from the cached record without a network call.
    pub async fn restore_session(self: &Arc<Self>) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        let bytes = match self.store.load(AUTH_TOKENS_KEY)? {
            Some(bytes) => bytes,
            None => {
                debug!("no persisted tokens; staying signed out");
                return Ok(());
            }
        };

        let tokens: AuthTokens = match serde_json::from_slice(&bytes) {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, "persisted token bundle unreadable; signing out");
                self.purge_persisted();
                self.set_state(&mut inner, SessionState::SignedOut);
                return Ok(());
            }
        };

        if tokens.is_expired() {
            match self.refresh_session(&tokens).await {
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "token refresh failed; signing out");
                    self.purge_persisted();
                    self.set_state(&mut inner, SessionState::SignedOut);
                    return Ok(());
                }
            }
        }

        match self.load_cached_user() {
            Some(cached) => {
                inner.last_refresh = Some(cached.last_refresh);
                let user_id = cached.user.id.clone();
                self.set_state(&mut inner, SessionState::SignedIn(cached.user));
                self.start_refresh_task();
                info!(user_id, "session restored from cache");
                Ok(())
            }
            None => {
                warn!("valid tokens without a cached user; signing out");
                self.purge_persisted();
                self.set_state(&mut inner, SessionState::SignedOut);
                Ok(())
            }
        }
    }

    /// Re-fetch the signed-in user's record.
    ///
    /// A no-op when signed out, and within five minutes of the last
    /// successful refresh the cached record is considered valid and no
    /// network call is made. A fetch failure propagates to the caller
    /// without changing session state.
    pub async fn refresh_user_data(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        let user_id = match inner.state.user() {
            Some(user) => user.id.clone(),
            None => return Ok(()),
        };

        if let Some(last_refresh) = inner.last_refresh {
            if Utc::now() - last_refresh
                < ChronoDuration::seconds(self.refresh_interval_secs as i64)
            {
                debug!(user_id, "refresh window open; using cached data");
                return Ok(());
            }
        }

        let user = self.user_api.fetch_user(&user_id).await?;
        let now = Utc::now();
        self.cache_user(&user, now);
        inner.last_refresh = Some(now);
        self.set_state(&mut inner, SessionState::SignedIn(user));
        debug!(user_id, "user data refreshed");
        Ok(())
    }

    /// Sign out unconditionally: delete persisted credentials and cache,
    /// cancel the refresh schedule, and transition to `SignedOut`.
    pub async fn sign_out(&self) {
        let mut inner = self.inner.lock().await;
        self.stop_refresh_task();
        self.purge_persisted();
        inner.last_refresh = None;
        self.set_state(&mut inner, SessionState::SignedOut);
        info!("signed out");
    }

    // ========================================================================
    // Projections
    // ========================================================================

    /// Current session state.
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.inner.lock().await.state.is_signed_in()
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.inner.lock().await.state.user().cloned()
    }

    pub async fn user_first_name(&self) -> Option<String> {
        self.with_user(|user| user.first_name.clone()).await
    }

    pub async fn user_last_name(&self) -> Option<String> {
        self.with_user(|user| user.last_name.clone()).await
    }

    pub async fn user_email(&self) -> Option<String> {
        self.with_user(|user| user.email.clone()).await
    }

    pub async fn user_phone(&self) -> Option<String> {
        self.with_user(|user| user.phone.clone()).await
    }

    /// Delivery addresses of the signed-in user; empty when signed out.
    pub async fn delivery_addresses(&self) -> Vec<DeliveryAddress> {
        self.with_user(|user| user.delivery_addresses.clone())
            .await
            .unwrap_or_default()
    }

    /// Payment methods of the signed-in user; empty when signed out.
    pub async fn payment_methods(&self) -> Vec<String> {
        self.with_user(|user| user.payment_methods.clone())
            .await
            .unwrap_or_default()
    }

    /// Order-history ids of the signed-in user; empty when signed out.
    pub async fn order_history(&self) -> Vec<String> {
        self.with_user(|user| user.order_history.clone())
            .await
            .unwrap_or_default()
    }

    /// Moment of the last successful refresh, if any.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_refresh
    }

    async fn with_user<T>(&self, f: impl FnOnce(&User) -> T) -> Option<T> {
        self.inner.lock().await.state.user().map(f)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn set_state(&self, inner: &mut Inner, state: SessionState) {
        inner.state = state.clone();
        // Send only fails when there are no subscribers.
        let _ = self.events.send(state);
    }

    /// Exchange an expired bundle for a fresh one.
    async fn refresh_session(&self, _tokens: &AuthTokens) -> Result<AuthTokens, SessionError> {
        // TODO: call the auth backend's token refresh endpoint once it
        // exists; until then an expired session cannot be revived.
        Err(SessionError::not_implemented("token refresh"))
    }

    fn persist_tokens(&self, tokens: &AuthTokens) -> Result<(), crate::error::StoreError> {
        let bytes = serde_json::to_vec(tokens)?;
        self.store.save(AUTH_TOKENS_KEY, &bytes)
    }

    /// Cache the user record. A cache write failure is logged and
    /// swallowed; the in-memory state stays authoritative.
    fn cache_user(&self, user: &User, last_refresh: DateTime<Utc>) {
        let cached = CachedUser {
            user: user.clone(),
            last_refresh,
        };
        let result = serde_json::to_vec(&cached)
            .map_err(crate::error::StoreError::from)
            .and_then(|bytes| self.store.save(CACHED_USER_KEY, &bytes));
        if let Err(err) = result {
            warn!(error = %err, "failed to cache user data");
        }
    }

    fn load_cached_user(&self) -> Option<CachedUser> {
        match self.store.load(CACHED_USER_KEY) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).ok(),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to load cached user data");
                None
            }
        }
    }

    /// Delete both persisted keys. Store failures are logged, not
    /// surfaced; sign-out cannot fail.
    fn purge_persisted(&self) {
        for key in [AUTH_TOKENS_KEY, CACHED_USER_KEY] {
            if let Err(err) = self.store.delete(key) {
                warn!(key, error = %err, "failed to delete persisted entry");
            }
        }
    }

    fn start_refresh_task(self: &Arc<Self>) {
        let mut guard = self.refresh_task.lock().expect("refresh task lock poisoned");
        if let Some(handle) = guard.take() {
            handle.abort();
        }
        *guard = Some(refresh::spawn(
            Arc::downgrade(self),
            std::time::Duration::from_secs(self.refresh_interval_secs),
        ));
    }

    fn stop_refresh_task(&self) {
        let mut guard = self.refresh_task.lock().expect("refresh task lock poisoned");
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.stop_refresh_task();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::MockUserApi;
    use crate::services::StubAuthBackend;
    use crate::store::MemoryTokenStore;
    use crate::error::ApiError;

    fn test_user(id: &str) -> User {
        User {
            id: id.to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            phone: "+15550100".to_string(),
            country_code: None,
            profile_photo: None,
            delivery_addresses: Vec::new(),
            payment_methods: vec!["pm_1".to_string()],
            order_history: vec!["o1".to_string()],
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2025-01-01T00:00:00Z".parse().unwrap(),
            version: 1,
        }
    }

    fn manager_with(
        user_api: MockUserApi,
        store: Arc<MemoryTokenStore>,
        config: &ClientConfig,
    ) -> Arc<SessionManager> {
        SessionManager::new(
            Arc::new(user_api),
            Arc::new(StubAuthBackend::new()),
            store,
            config,
        )
    }

    fn stored_tokens(store: &MemoryTokenStore) -> Option<AuthTokens> {
        store
            .load(AUTH_TOKENS_KEY)
            .unwrap()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    fn seed_tokens(store: &MemoryTokenStore, expires_at: DateTime<Utc>) {
        let tokens = AuthTokens {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at,
        };
        store
            .save(AUTH_TOKENS_KEY, &serde_json::to_vec(&tokens).unwrap())
            .unwrap();
    }

    fn seed_cached_user(store: &MemoryTokenStore, user: &User, last_refresh: DateTime<Utc>) {
        let cached = CachedUser {
            user: user.clone(),
            last_refresh,
        };
        store
            .save(CACHED_USER_KEY, &serde_json::to_vec(&cached).unwrap())
            .unwrap();
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user()
            .times(1)
            .returning(|id| Ok(test_user(id)));
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store.clone(), &ClientConfig::default());

        manager.sign_in("u1").await.unwrap();

        assert!(manager.is_signed_in().await);
        assert_eq!(manager.user_first_name().await.as_deref(), Some("Ann"));

        // A one-hour placeholder bundle is persisted.
        let tokens = stored_tokens(&store).unwrap();
        let ttl = tokens.expires_at - Utc::now();
        assert!(ttl > ChronoDuration::seconds(3590));
        assert!(ttl <= ChronoDuration::seconds(3600));

        // The user record is cached for restores.
        assert!(store.load(CACHED_USER_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_failure_signs_out_and_purges() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user()
            .returning(|_| Err(ApiError::server(500, "boom")));
        let store = Arc::new(MemoryTokenStore::new());
        seed_tokens(&store, Utc::now() + ChronoDuration::hours(1));
        let manager = manager_with(api, store.clone(), &ClientConfig::default());

        let err = manager.sign_in("u1").await.unwrap_err();

        match err {
            SessionError::Api(ApiError::ServerError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!manager.is_signed_in().await);
        assert!(store.load(AUTH_TOKENS_KEY).unwrap().is_none());
        assert!(store.load(CACHED_USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_publishes_loading_then_signed_in() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().returning(|id| Ok(test_user(id)));
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        let mut events = manager.subscribe();
        manager.sign_in("u1").await.unwrap();

        assert_eq!(events.recv().await.unwrap(), SessionState::Loading);
        assert!(matches!(
            events.recv().await.unwrap(),
            SessionState::SignedIn(user) if user.id == "u1"
        ));
    }

    #[tokio::test]
    async fn test_restore_without_tokens_stays_signed_out() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().times(0);
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        manager.restore_session().await.unwrap();
        assert!(!manager.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_restore_with_valid_tokens_uses_cache_only() {
        let mut api = MockUserApi::new();
        // Restoration must not hit the network.
        api.expect_fetch_user().times(0);
        let store = Arc::new(MemoryTokenStore::new());
        seed_tokens(&store, Utc::now() + ChronoDuration::hours(1));
        seed_cached_user(&store, &test_user("u1"), Utc::now());
        let manager = manager_with(api, store, &ClientConfig::default());

        manager.restore_session().await.unwrap();

        assert!(manager.is_signed_in().await);
        assert_eq!(manager.user_email().await.as_deref(), Some("ann@example.com"));
    }

    #[tokio::test]
    async fn test_restore_with_expired_tokens_purges_and_signs_out() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().times(0);
        let store = Arc::new(MemoryTokenStore::new());
        seed_tokens(&store, Utc::now() - ChronoDuration::minutes(1));
        seed_cached_user(&store, &test_user("u1"), Utc::now());
        let manager = manager_with(api, store.clone(), &ClientConfig::default());

        manager.restore_session().await.unwrap();

        assert!(!manager.is_signed_in().await);
        assert!(store.load(AUTH_TOKENS_KEY).unwrap().is_none());
        assert!(store.load(CACHED_USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_restore_with_tokens_but_no_cache_signs_out() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().times(0);
        let store = Arc::new(MemoryTokenStore::new());
        seed_tokens(&store, Utc::now() + ChronoDuration::hours(1));
        let manager = manager_with(api, store.clone(), &ClientConfig::default());

        manager.restore_session().await.unwrap();

        assert!(!manager.is_signed_in().await);
        assert!(store.load(AUTH_TOKENS_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_is_noop_when_signed_out() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().times(0);
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        manager.refresh_user_data().await.unwrap();
        assert!(!manager.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_refresh_within_window_skips_network() {
        let mut api = MockUserApi::new();
        // Exactly one fetch: the sign-in. The two refreshes fall inside
        // the five-minute window.
        api.expect_fetch_user()
            .times(1)
            .returning(|id| Ok(test_user(id)));
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        manager.sign_in("u1").await.unwrap();
        manager.refresh_user_data().await.unwrap();
        manager.refresh_user_data().await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_after_window_fetches_again() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user()
            .times(2)
            .returning(|id| {
                let mut user = test_user(id);
                user.version += 1;
                Ok(user)
            });
        let store = Arc::new(MemoryTokenStore::new());
        seed_tokens(&store, Utc::now() + ChronoDuration::hours(1));
        let config = ClientConfig::default();
        let manager = manager_with(api, store, &config);

        manager.sign_in("u1").await.unwrap();

        // Age the last refresh past the window.
        manager.inner.lock().await.last_refresh =
            Some(Utc::now() - ChronoDuration::seconds(config.refresh_interval_secs as i64 + 1));

        manager.refresh_user_data().await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_session_state() {
        let mut api = MockUserApi::new();
        let mut first = true;
        api.expect_fetch_user().returning(move |id| {
            if first {
                first = false;
                Ok(test_user(id))
            } else {
                Err(ApiError::NetworkError("connection reset".to_string()))
            }
        });
        let store = Arc::new(MemoryTokenStore::new());
        let config = ClientConfig::default();
        let manager = manager_with(api, store, &config);

        manager.sign_in("u1").await.unwrap();
        manager.inner.lock().await.last_refresh =
            Some(Utc::now() - ChronoDuration::seconds(config.refresh_interval_secs as i64 + 1));

        let err = manager.refresh_user_data().await.unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::NetworkError(_))));

        // A transient refresh failure does not sign the user out.
        assert!(manager.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_sign_out_clears_everything() {
        let mut api = MockUserApi::new();
        api.expect_fetch_user().returning(|id| Ok(test_user(id)));
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store.clone(), &ClientConfig::default());

        manager.sign_in("u1").await.unwrap();
        manager.sign_out().await;

        assert!(!manager.is_signed_in().await);
        assert!(manager.user_first_name().await.is_none());
        assert!(manager.user_email().await.is_none());
        assert!(manager.delivery_addresses().await.is_empty());
        assert!(store.load(AUTH_TOKENS_KEY).unwrap().is_none());
        assert!(store.load(CACHED_USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_harmless() {
        let api = MockUserApi::new();
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        manager.sign_out().await;
        assert!(!manager.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_projections_when_signed_out() {
        let api = MockUserApi::new();
        let store = Arc::new(MemoryTokenStore::new());
        let manager = manager_with(api, store, &ClientConfig::default());

        assert!(manager.current_user().await.is_none());
        assert!(manager.user_first_name().await.is_none());
        assert!(manager.user_phone().await.is_none());
        assert!(manager.payment_methods().await.is_empty());
        assert!(manager.order_history().await.is_empty());
        assert!(manager.last_refresh().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_make_one_network_call() {
        // Two refresh calls race past an expired window. They serialize
        // on the manager lock; the loser lands inside the window the
        // winner just reset and skips the network entirely.
        let mut api = MockUserApi::new();
        api.expect_fetch_user()
            .times(2)
            .returning(|id| Ok(test_user(id)));
        let store = Arc::new(MemoryTokenStore::new());
        let config = ClientConfig::default();
        let manager = manager_with(api, store, &config);

        manager.sign_in("u1").await.unwrap();
        manager.inner.lock().await.last_refresh =
            Some(Utc::now() - ChronoDuration::seconds(config.refresh_interval_secs as i64 + 1));

        let a = manager.refresh_user_data();
        let b = manager.refresh_user_data();
        let (ra, rb) = tokio::join!(a, b);
        ra.unwrap();
        rb.unwrap();
    }
}
