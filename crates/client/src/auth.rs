//! Authentication context
//!
//! The single owner of "who is signed in". Each operation performs the side
//! effects of a transition (persisting or clearing the auth store) and returns
//! the state to move to; the UI keeps the returned value and nothing else.

use std::sync::Arc;

use sentinel_core::ConsoleResult;
use sentinel_model::ClientUser;

use crate::auth_store::AuthStore;
use crate::error::AuthResult;
use crate::identity::{DeviceAuthorization, IdentityProvider, IdentitySession, Provider};

/// Where authentication stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Startup; the stored session has not been resolved yet
    #[default]
    Loading,
    Authenticated {
        user: ClientUser,
        token: String,
    },
    Unauthenticated,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&ClientUser> {
        match self {
            AuthState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    fn from_session(session: IdentitySession) -> Self {
        AuthState::Authenticated {
            user: session.user,
            token: session.id_token,
        }
    }
}

/// Auth transitions over the identity provider and the auth store
#[derive(Clone)]
pub struct AuthContext {
    store: AuthStore,
    identity: Arc<dyn IdentityProvider>,
}

impl AuthContext {
    pub fn new(store: AuthStore, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    /// Resolve the stored session at startup
    ///
    /// A refresh token is exchanged for a fresh ID token; without one, a stored
    /// token and user are trusted until the backend answers `401`.
    pub async fn resolve_startup(&self) -> AuthState {
        if let Some(refresh) = self.store.refresh_token() {
            return match self.identity.restore(&refresh).await {
                Ok(session) => match self.store.persist(&session) {
                    Ok(()) => {
                        tracing::info!("Restored session for {}", session.user.greeting_name());
                        AuthState::from_session(session)
                    }
                    Err(err) => {
                        tracing::error!("Could not persist restored session: {}", err);
                        self.clear_quietly();
                        AuthState::Unauthenticated
                    }
                },
                Err(err) => {
                    tracing::warn!("Stored session could not be restored: {}", err);
                    self.clear_quietly();
                    AuthState::Unauthenticated
                }
            };
        }

        match (self.store.token(), self.store.user()) {
            (Some(token), Some(user)) => {
                tracing::info!("Resumed stored session for {}", user.greeting_name());
                AuthState::Authenticated { user, token }
            }
            _ => AuthState::Unauthenticated,
        }
    }

    /// Start signing in with `provider`
    pub async fn begin_sign_in(&self, provider: Provider) -> AuthResult<DeviceAuthorization> {
        self.identity.begin(provider).await
    }

    /// Wait for approval; nothing is persisted unless sign-in succeeds
    pub async fn finish_sign_in(&self, authorization: &DeviceAuthorization) -> AuthResult<AuthState> {
        let session = self.identity.complete(authorization).await?;
        self.store.persist(&session)?;
        Ok(AuthState::from_session(session))
    }

    /// Explicit sign-out
    pub fn sign_out(&self) -> ConsoleResult<AuthState> {
        self.store.clear()?;
        tracing::info!("Signed out");
        Ok(AuthState::Unauthenticated)
    }

    /// The backend rejected the token
    pub fn on_unauthorized(&self) -> AuthState {
        tracing::warn!("Session rejected by the backend");
        self.clear_quietly();
        AuthState::Unauthenticated
    }

    fn clear_quietly(&self) {
        if let Err(err) = self.store.clear() {
            tracing::error!("Could not clear stored session: {}", err);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::storage::{LocalStore, keys};
    use crate::testing::unwritable_store;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubIdentity {
        restore: Mutex<Option<AuthResult<IdentitySession>>>,
        complete: Mutex<Option<AuthResult<IdentitySession>>>,
    }

    #[async_trait]
    impl IdentityProvider for StubIdentity {
        async fn restore(&self, _refresh_token: &str) -> AuthResult<IdentitySession> {
            self.restore.lock().unwrap().take().expect("unexpected restore")
        }

        async fn begin(&self, provider: Provider) -> AuthResult<DeviceAuthorization> {
            Ok(DeviceAuthorization {
                provider,
                device_code: "d".into(),
                user_code: "CODE".into(),
                verification_uri: "https://example.com/device".into(),
                expires_in: 600,
                interval: 0,
            })
        }

        async fn complete(&self, _authorization: &DeviceAuthorization) -> AuthResult<IdentitySession> {
            self.complete.lock().unwrap().take().expect("unexpected complete")
        }
    }

    fn session(token: &str) -> IdentitySession {
        IdentitySession {
            user: ClientUser {
                uid: "u1".into(),
                email: Some("ana@example.com".into()),
                ..ClientUser::default()
            },
            id_token: token.into(),
            refresh_token: Some("refresh".into()),
            expires_in: 3600,
        }
    }

    fn context(stub: StubIdentity) -> (AuthContext, LocalStore) {
        let store = LocalStore::in_memory();
        let ctx = AuthContext::new(AuthStore::new(store.clone()), Arc::new(stub));
        (ctx, store)
    }

    #[test]
    fn test_initial_state_is_loading() {
        assert!(AuthState::default().is_loading());
    }

    #[tokio::test]
    async fn test_startup_without_session() {
        let (ctx, _) = context(StubIdentity::default());
        assert_eq!(ctx.resolve_startup().await, AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_startup_restores_with_refresh_token() {
        let stub = StubIdentity::default();
        *stub.restore.lock().unwrap() = Some(Ok(session("fresh")));
        let (ctx, store) = context(stub);
        store.set(keys::REFRESH_TOKEN, "old").unwrap();

        let state = ctx.resolve_startup().await;
        assert!(state.is_authenticated());
        assert_eq!(store.get(keys::TOKEN).as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_failed_restore_clears_store() {
        let stub = StubIdentity::default();
        *stub.restore.lock().unwrap() = Some(Err(AuthError::Provider("TOKEN_EXPIRED".into())));
        let (ctx, store) = context(stub);
        store.set(keys::REFRESH_TOKEN, "old").unwrap();
        store.set(keys::TOKEN, "stale").unwrap();

        assert_eq!(ctx.resolve_startup().await, AuthState::Unauthenticated);
        assert_eq!(store.get(keys::TOKEN), None);
        assert_eq!(store.get(keys::REFRESH_TOKEN), None);
    }

    #[tokio::test]
    async fn test_unpersistable_restore_clears_store() {
        let stub = StubIdentity::default();
        *stub.restore.lock().unwrap() = Some(Ok(session("fresh")));
        let (_dir, store) = unwritable_store();
        let ctx = AuthContext::new(AuthStore::new(store.clone()), Arc::new(stub));

        assert_eq!(ctx.resolve_startup().await, AuthState::Unauthenticated);
        assert_eq!(store.get(keys::TOKEN), None);
        assert_eq!(store.get(keys::REFRESH_TOKEN), None);
        assert_eq!(store.get(keys::USER), None);
    }

    #[tokio::test]
    async fn test_sign_in_persists_on_success() {
        let stub = StubIdentity::default();
        *stub.complete.lock().unwrap() = Some(Ok(session("id-1")));
        let (ctx, store) = context(stub);

        let authorization = ctx.begin_sign_in(Provider::Google).await.unwrap();
        let state = ctx.finish_sign_in(&authorization).await.unwrap();
        assert_eq!(state.user().unwrap().uid, "u1");
        assert_eq!(store.get(keys::TOKEN).as_deref(), Some("id-1"));
        assert!(store.contains(keys::USER));
    }

    #[tokio::test]
    async fn test_collision_persists_nothing() {
        let stub = StubIdentity::default();
        *stub.complete.lock().unwrap() = Some(Err(AuthError::AccountExistsWithDifferentProvider {
            email: "ana@example.com".into(),
            providers: vec!["Google".into()],
        }));
        let (ctx, store) = context(stub);

        let authorization = ctx.begin_sign_in(Provider::GitHub).await.unwrap();
        let err = ctx.finish_sign_in(&authorization).await.unwrap_err();
        assert!(err.user_message().contains("Google"));
        assert_eq!(store.get(keys::TOKEN), None);
        assert_eq!(store.get(keys::USER), None);
    }

    #[tokio::test]
    async fn test_sign_out_clears_identity_only() {
        let stub = StubIdentity::default();
        *stub.complete.lock().unwrap() = Some(Ok(session("id-1")));
        let (ctx, store) = context(stub);
        store.set(keys::UI_VARIANT, "bootstrap").unwrap();

        let authorization = ctx.begin_sign_in(Provider::Google).await.unwrap();
        ctx.finish_sign_in(&authorization).await.unwrap();

        assert_eq!(ctx.sign_out().unwrap(), AuthState::Unauthenticated);
        assert_eq!(store.get(keys::TOKEN), None);
        assert_eq!(store.get(keys::USER), None);
        assert_eq!(store.get(keys::UI_VARIANT).as_deref(), Some("bootstrap"));
    }

    #[test]
    fn test_on_unauthorized() {
        let (ctx, store) = context(StubIdentity::default());
        store.set(keys::TOKEN, "t").unwrap();
        assert_eq!(ctx.on_unauthorized(), AuthState::Unauthenticated);
        assert!(!ctx.store().is_signed_in());
    }
}
