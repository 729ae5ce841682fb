//! Role-gating decision shared by every protected page.

use afritheatre_core::UserRecord;

use super::SessionState;

/// Outcome of asking whether the current session may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<'a> {
    /// Re-validation has not finished; render neither branch.
    Pending,
    /// Nobody is logged in.
    LoginRequired,
    /// Logged in, but the predicate rejected the user.
    Forbidden,
    /// Logged in and allowed.
    Allowed(&'a UserRecord),
}

impl Access<'_> {
    /// Returns `true` only for [`Access::Allowed`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

/// Decide access for `state` using `allowed` as the role predicate.
pub fn authorize<F>(state: &SessionState, allowed: F) -> Access<'_>
where
    F: FnOnce(&UserRecord) -> bool,
{
    match state {
        SessionState::Initializing => Access::Pending,
        SessionState::Anonymous => Access::LoginRequired,
        SessionState::Authenticated(user) if allowed(user) => Access::Allowed(user),
        SessionState::Authenticated(_) => Access::Forbidden,
    }
}

/// Predicate for admin-only pages.
#[must_use]
pub fn admin_only(user: &UserRecord) -> bool {
    user.is_admin()
}

/// Predicate for pages open to any logged-in user.
#[must_use]
pub const fn any_user(_user: &UserRecord) -> bool {
    true
}
