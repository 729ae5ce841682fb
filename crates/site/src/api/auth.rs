//! Credential exchange endpoints.

use afritheatre_core::UserRecord;
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, AuthResponse, LoginRequest, RegisterRequest};

impl ApiClient {
    /// Exchange email and password for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for rejected credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/api/auth/login", None)
            .json(&LoginRequest { email, password });
        Self::send_json(builder).await
    }

    /// Create an account. The caller signs in separately afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the API refuses the registration.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
    ) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/api/auth/register", None)
            .json(&RegisterRequest {
                name,
                email,
                password,
                phone,
            });
        Self::send_empty(builder).await
    }

    /// Resolve a token to its owner.
    ///
    /// Unlike the session manager's identity check, this keeps the API's
    /// error details.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for an invalid or expired token.
    #[instrument(skip_all)]
    pub async fn me(&self, token: &SecretString) -> Result<UserRecord, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/auth/me", Some(token))).await
    }
}
