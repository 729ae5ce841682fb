//! Client-side authentication state.
//!
//! [`SessionManager`] is the single source of truth for "who is logged in".
//! It pairs an in-memory [`SessionState`] with a durable [`TokenStore`] and
//! re-validates the stored token against an [`IdentityProvider`].
//!
//! # State machine
//!
//! ```text
//!                  check_auth ok
//!   Initializing ───────────────▶ Authenticated(user)
//!        │                              ▲      │
//!        │ check_auth err               │login │logout
//!        ▼                              │      ▼
//!    Anonymous ◀────────────────────────┴── Anonymous
//! ```
//!
//! Every failure during re-validation collapses to `Anonymous` and wipes the
//! stored token. The cause is kept in [`AuthCheckFailed`] for logging only.

mod guard;
mod identity;
mod store;

use afritheatre_core::UserRecord;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use guard::{Access, admin_only, any_user, authorize};
pub use identity::{IdentityError, IdentityProvider};
pub use store::{MemoryTokenStore, TokenStore};

/// Authentication status of one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Startup re-validation has not completed.
    #[default]
    Initializing,
    /// Nobody is logged in.
    Anonymous,
    /// A token was accepted and this is its owner.
    Authenticated(UserRecord),
}

/// Why `check_auth` ended in `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthCheckFailed {
    /// The slot was empty.
    #[error("no persisted credential")]
    MissingCredential,
    /// The identity endpoint did not confirm the token.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Holds the current session and keeps it in step with the token slot.
///
/// Mutators take `&mut self`, so two re-validations can never overlap on one
/// instance.
#[derive(Debug)]
pub struct SessionManager<S, I> {
    store: S,
    identity: I,
    state: SessionState,
    token: Option<SecretString>,
}

impl<S, I> SessionManager<S, I>
where
    S: TokenStore,
    I: IdentityProvider,
{
    /// Create a manager in the `Initializing` state.
    ///
    /// Nothing is read from `store` until [`Self::check_auth`] runs.
    pub const fn new(store: S, identity: I) -> Self {
        Self {
            store,
            identity,
            state: SessionState::Initializing,
            token: None,
        }
    }

    /// Current state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The logged-in user, if any.
    pub const fn current_user(&self) -> Option<&UserRecord> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Initializing | SessionState::Anonymous => None,
        }
    }

    /// `true` iff a user is authenticated.
    pub const fn is_logged_in(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// `true` while re-validation has not completed.
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Initializing)
    }

    /// Bearer token for the authenticated user.
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// The underlying token slot.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Identity provider used by [`Self::check_auth`].
    pub const fn identity(&self) -> &I {
        &self.identity
    }

    /// Role-gating decision for the current state.
    pub fn authorize<F>(&self, allowed: F) -> Access<'_>
    where
        F: FnOnce(&UserRecord) -> bool,
    {
        authorize(&self.state, allowed)
    }

    /// Record a successful credential exchange.
    ///
    /// The token is persisted before the in-memory state changes. No network
    /// validation is performed and any previously held token is superseded.
    #[tracing::instrument(skip_all, fields(email = %user.email))]
    pub async fn login(&mut self, token: SecretString, user: UserRecord) {
        self.store.save(&token).await;
        self.token = Some(token);
        self.state = SessionState::Authenticated(user);
        tracing::debug!("Session authenticated");
    }

    /// Forget the current user and wipe the slot. Safe to call repeatedly.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&mut self) {
        self.store.clear().await;
        self.token = None;
        self.state = SessionState::Anonymous;
    }

    /// Rehydrate from the persisted token.
    ///
    /// On success the session becomes `Authenticated` with exactly the record
    /// the identity endpoint returned. On any failure the slot is cleared, the
    /// session becomes `Anonymous` and the cause is returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthCheckFailed::MissingCredential` when the slot is empty and
    /// `AuthCheckFailed::Identity` when the endpoint did not confirm the token.
    #[tracing::instrument(skip_all)]
    pub async fn check_auth(&mut self) -> Result<(), AuthCheckFailed> {
        self.state = SessionState::Initializing;

        match self.revalidate().await {
            Ok((token, user)) => {
                self.token = Some(token);
                self.state = SessionState::Authenticated(user);
                Ok(())
            }
            Err(err) => {
                if let AuthCheckFailed::Identity(cause) = &err {
                    tracing::info!(error = %cause, "Discarding persisted credential");
                }
                self.store.clear().await;
                self.token = None;
                self.state = SessionState::Anonymous;
                Err(err)
            }
        }
    }

    async fn revalidate(&self) -> Result<(SecretString, UserRecord), AuthCheckFailed> {
        let token = self
            .store
            .load()
            .await
            .filter(|token| !token.expose_secret().is_empty())
            .ok_or(AuthCheckFailed::MissingCredential)?;
        let user = self.identity.fetch_identity(&token).await?;
        Ok((token, user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use afritheatre_core::{Email, Role};

    use super::*;

    /// Identity provider with a canned answer.
    struct Canned(Result<UserRecord, IdentityError>);

    impl IdentityProvider for Canned {
        async fn fetch_identity(&self, _token: &SecretString) -> Result<UserRecord, IdentityError> {
            self.0.clone()
        }
    }

    /// Identity provider that only accepts one token.
    struct OnlyToken(&'static str, UserRecord);

    impl IdentityProvider for OnlyToken {
        async fn fetch_identity(&self, token: &SecretString) -> Result<UserRecord, IdentityError> {
            if token.expose_secret() == self.0 {
                Ok(self.1.clone())
            } else {
                Err(IdentityError::Rejected { status: 401 })
            }
        }
    }

    fn asha() -> UserRecord {
        UserRecord::new("Asha".to_string(), Email::parse("a@x.com").unwrap()).with_role(Role::Admin)
    }

    fn bo() -> UserRecord {
        UserRecord::new("Bo".to_string(), Email::parse("b@x.com").unwrap())
    }

    fn manager(
        store: &MemoryTokenStore,
        answer: Result<UserRecord, IdentityError>,
    ) -> SessionManager<MemoryTokenStore, Canned> {
        SessionManager::new(store.clone(), Canned(answer))
    }

    #[test]
    fn test_new_manager_is_initializing() {
        let session = manager(&MemoryTokenStore::new(), Ok(asha()));
        assert!(session.is_loading());
        assert!(!session.is_logged_in());
        assert!(session.current_user().is_none());
        assert_eq!(session.authorize(any_user), Access::Pending);
    }

    #[tokio::test]
    async fn test_check_auth_without_token_is_anonymous() {
        let store = MemoryTokenStore::new();
        let mut session = manager(&store, Ok(asha()));

        let result = session.check_auth().await;

        assert_eq!(result, Err(AuthCheckFailed::MissingCredential));
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_check_auth_fails_closed_for_every_cause() {
        let causes = [
            IdentityError::Rejected { status: 401 },
            IdentityError::Rejected { status: 403 },
            IdentityError::Rejected { status: 500 },
            IdentityError::Transport("connection refused".to_string()),
            IdentityError::Malformed("expected value at line 1".to_string()),
        ];

        for cause in causes {
            let store = MemoryTokenStore::with_token("tok-123");
            let mut session = manager(&store, Err(cause.clone()));

            let result = session.check_auth().await;

            assert_eq!(result, Err(AuthCheckFailed::Identity(cause)));
            assert_eq!(session.state(), &SessionState::Anonymous);
            assert!(session.token().is_none());
            assert!(store.peek().is_none());
        }
    }

    #[tokio::test]
    async fn test_check_auth_rehydrates_exact_record() {
        let store = MemoryTokenStore::with_token("tok-123");
        let mut session = SessionManager::new(store.clone(), OnlyToken("tok-123", asha()));

        session.check_auth().await.unwrap();

        assert_eq!(session.current_user(), Some(&asha()));
        assert!(session.current_user().unwrap().is_admin());
        assert_eq!(session.token().unwrap().expose_secret(), "tok-123");
        assert_eq!(store.peek().as_deref(), Some("tok-123"));
    }

    #[tokio::test]
    async fn test_expired_token_is_discarded() {
        let store = MemoryTokenStore::with_token("expired-tok");
        let mut session = SessionManager::new(store.clone(), OnlyToken("tok-123", asha()));

        assert!(session.check_auth().await.is_err());
        assert_eq!(session.state(), &SessionState::Anonymous);
        assert!(store.peek().is_none());
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_missing() {
        let store = MemoryTokenStore::with_token("");
        let mut session = manager(&store, Ok(asha()));

        assert_eq!(
            session.check_auth().await,
            Err(AuthCheckFailed::MissingCredential)
        );
        assert!(store.peek().is_none());
    }

    #[tokio::test]
    async fn test_login_from_anonymous_persists_token() {
        let store = MemoryTokenStore::new();
        let mut session = manager(&store, Err(IdentityError::Rejected { status: 401 }));
        let _ = session.check_auth().await;

        session.login(SecretString::from("new-tok"), bo()).await;

        assert!(session.is_logged_in());
        assert_eq!(session.current_user().unwrap().name, "Bo");
        assert_eq!(store.peek().as_deref(), Some("new-tok"));
    }

    #[tokio::test]
    async fn test_login_supersedes_previous_token() {
        let store = MemoryTokenStore::new();
        let mut session = manager(&store, Ok(bo()));

        session.login(SecretString::from("first"), asha()).await;
        session.login(SecretString::from("second"), bo()).await;

        assert_eq!(store.peek().as_deref(), Some("second"));
        assert_eq!(session.current_user(), Some(&bo()));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = MemoryTokenStore::new();
        let mut session = manager(&store, Ok(asha()));
        session.login(SecretString::from("tok"), asha()).await;

        session.logout().await;
        let once = (session.state().clone(), store.peek());
        session.logout().await;
        let twice = (session.state().clone(), store.peek());

        assert_eq!(once, twice);
        assert_eq!(once, (SessionState::Anonymous, None));
    }

    #[tokio::test]
    async fn test_login_then_logout_matches_fresh_anonymous() {
        let used_store = MemoryTokenStore::new();
        let mut used = manager(&used_store, Ok(asha()));
        used.login(SecretString::from("tok-a"), asha()).await;
        used.logout().await;

        let fresh_store = MemoryTokenStore::new();
        let mut fresh = manager(&fresh_store, Ok(asha()));
        let _ = fresh.check_auth().await;

        assert_eq!(used.state(), fresh.state());
        assert_eq!(used.token().is_none(), fresh.token().is_none());
        assert_eq!(used_store.peek(), fresh_store.peek());
    }

    #[tokio::test]
    async fn test_guard_follows_transitions() {
        let store = MemoryTokenStore::with_token("tok-123");
        let mut session = SessionManager::new(store, OnlyToken("tok-123", bo()));
        assert_eq!(session.authorize(admin_only), Access::Pending);

        session.check_auth().await.unwrap();
        assert_eq!(session.authorize(admin_only), Access::Forbidden);
        assert!(session.authorize(any_user).is_allowed());

        session.logout().await;
        assert_eq!(session.authorize(any_user), Access::LoginRequired);
    }
}
