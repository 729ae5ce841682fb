//! CLI command implementations.
//!
//! Every command shares one [`CliSession`]: the web front-end's session
//! manager paired with a [`FileTokenStore`] and the API client as identity
//! provider.

pub mod auth;
pub mod listings;

use afritheatre_core::UserRecord;
use afritheatre_site::api::{ApiClient, ApiError};
use afritheatre_site::config::ConfigError;
use afritheatre_site::forms::FormErrors;
use afritheatre_site::session::{Access, AuthCheckFailed, SessionManager};
use thiserror::Error;

use crate::token_file::FileTokenStore;

/// Session manager used by the CLI.
pub type CliSession = SessionManager<FileTokenStore, ApiClient>;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum CliError {
    /// API configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No token file location could be determined.
    #[error("Could not determine a token file location; set AFRITHEATRE_TOKEN_FILE")]
    NoTokenFile,

    /// The API refused or failed a request.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input failed local validation.
    #[error("Invalid input: {0}")]
    Invalid(#[from] FormErrors),

    /// The persisted token is missing or was not accepted.
    #[error("Not signed in ({0}). Run `afritheatre login` first.")]
    NotSignedIn(#[from] AuthCheckFailed),

    /// Signed in, but the account lacks the required role.
    #[error("This command requires an admin account")]
    Forbidden,
}

/// Re-validate the persisted token and apply `allowed` to its owner.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` if the token is missing or rejected, and
/// `CliError::Forbidden` if `allowed` rejects the user.
pub async fn require<F>(session: &mut CliSession, allowed: F) -> Result<UserRecord, CliError>
where
    F: FnOnce(&UserRecord) -> bool,
{
    session.check_auth().await?;
    match session.authorize(allowed) {
        Access::Allowed(user) => Ok(user.clone()),
        Access::Forbidden => Err(CliError::Forbidden),
        Access::Pending | Access::LoginRequired => {
            Err(CliError::NotSignedIn(AuthCheckFailed::MissingCredential))
        }
    }
}
