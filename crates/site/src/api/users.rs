//! User administration endpoints.

use afritheatre_core::{UserId, UserRecord};
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, UserUpdate};

impl ApiClient {
    /// List every registered user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user array.
    #[instrument(skip_all)]
    pub async fn list_users(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<UserRecord>, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/auth/users", token)).await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the user does not exist.
    #[instrument(skip(self, token))]
    pub async fn get_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
    ) -> Result<UserRecord, ApiError> {
        let path = format!("/api/auth/users/{}", urlencoding::encode(id.as_str()));
        Self::send_json(self.request(Method::GET, &path, token)).await
    }

    /// Replace a user's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self, token, update))]
    pub async fn update_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<(), ApiError> {
        let path = format!("/api/auth/users/{}", urlencoding::encode(id.as_str()));
        Self::send_empty(self.request(Method::PUT, &path, token).json(update)).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the deletion.
    #[instrument(skip(self, token))]
    pub async fn delete_user(
        &self,
        token: Option<&SecretString>,
        id: &UserId,
    ) -> Result<(), ApiError> {
        let path = format!("/api/auth/users/{}", urlencoding::encode(id.as_str()));
        Self::send_empty(self.request(Method::DELETE, &path, token)).await
    }
}
