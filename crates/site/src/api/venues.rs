//! Venue endpoints.

use afritheatre_core::VenueId;
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, Venue, VenueInput};

fn venue_path(id: &VenueId) -> String {
    format!("/api/venues/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// All venues (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a venue array.
    #[instrument(skip_all)]
    pub async fn list_venues(&self, token: Option<&SecretString>) -> Result<Vec<Venue>, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/venues", token)).await
    }

    /// Venues shown on the public listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a venue array.
    #[instrument(skip_all)]
    pub async fn list_public_venues(&self) -> Result<Vec<Venue>, ApiError> {
        Self::send_json(self.request(Method::GET, "/api/venues/public", None)).await
    }

    /// Fetch one venue.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the venue does not exist.
    #[instrument(skip(self, token))]
    pub async fn get_venue(
        &self,
        token: Option<&SecretString>,
        id: &VenueId,
    ) -> Result<Venue, ApiError> {
        Self::send_json(self.request(Method::GET, &venue_path(id), token)).await
    }

    /// Create a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the venue.
    #[instrument(skip(self, token), fields(name = %input.name))]
    pub async fn create_venue(
        &self,
        token: Option<&SecretString>,
        input: &VenueInput,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::POST, "/api/venues", token).json(input)).await
    }

    /// Replace a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self, token, input))]
    pub async fn update_venue(
        &self,
        token: Option<&SecretString>,
        id: &VenueId,
        input: &VenueInput,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::PUT, &venue_path(id), token).json(input)).await
    }

    /// Delete a venue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the deletion.
    #[instrument(skip(self, token))]
    pub async fn delete_venue(
        &self,
        token: Option<&SecretString>,
        id: &VenueId,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &venue_path(id), token)).await
    }
}
