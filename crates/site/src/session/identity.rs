//! Identity endpoint seam.

use std::future::Future;

use afritheatre_core::UserRecord;
use secrecy::SecretString;
use thiserror::Error;

/// Why the identity endpoint did not confirm a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The endpoint answered with a non-success status.
    #[error("identity endpoint rejected the token (status {status})")]
    Rejected {
        /// HTTP status code returned by the endpoint.
        status: u16,
    },
    /// The request never produced a response (connect failure, timeout).
    #[error("identity endpoint unreachable: {0}")]
    Transport(String),
    /// The endpoint answered 2xx but the body was not a user record.
    #[error("identity endpoint returned a malformed body: {0}")]
    Malformed(String),
}

/// Resolves a bearer token to the user it belongs to.
///
/// Implemented by the API client against `GET /api/auth/me`; tests supply
/// canned answers.
pub trait IdentityProvider: Send + Sync {
    /// Ask the identity endpoint who owns `token`.
    fn fetch_identity(
        &self,
        token: &SecretString,
    ) -> impl Future<Output = Result<UserRecord, IdentityError>> + Send;
}
