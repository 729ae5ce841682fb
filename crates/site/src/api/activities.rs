//! Theatre activity endpoints.
//!
//! Listings come wrapped in `{ "data": [...] }`; single records are bare.

use afritheatre_core::ActivityId;
use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, DataEnvelope, TheatreActivity};

fn activity_path(id: &ActivityId) -> String {
    format!("/api/theatre-activities/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// All recorded activities (admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    #[instrument(skip_all)]
    pub async fn list_activities(
        &self,
        token: Option<&SecretString>,
    ) -> Result<Vec<TheatreActivity>, ApiError> {
        let envelope: DataEnvelope<TheatreActivity> =
            Self::send_json(self.request(Method::GET, "/api/theatre-activities", token)).await?;
        Ok(envelope.data)
    }

    /// Activities shown on the public events page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the envelope is malformed.
    #[instrument(skip_all)]
    pub async fn list_public_activities(&self) -> Result<Vec<TheatreActivity>, ApiError> {
        let envelope: DataEnvelope<TheatreActivity> = Self::send_json(self.request(
            Method::GET,
            "/api/theatre-activities/public",
            None,
        ))
        .await?;
        Ok(envelope.data)
    }

    /// Fetch one activity.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the activity does not exist.
    #[instrument(skip(self, token))]
    pub async fn get_activity(
        &self,
        token: Option<&SecretString>,
        id: &ActivityId,
    ) -> Result<TheatreActivity, ApiError> {
        Self::send_json(self.request(Method::GET, &activity_path(id), token)).await
    }

    /// Record a new activity from the data-collection form.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the submission.
    #[instrument(skip(self, token, activity), fields(event = %activity.event_name))]
    pub async fn submit_activity(
        &self,
        token: Option<&SecretString>,
        activity: &TheatreActivity,
    ) -> Result<(), ApiError> {
        Self::send_empty(
            self.request(Method::POST, "/api/theatre/submit", token)
                .json(activity),
        )
        .await
    }

    /// Replace an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update.
    #[instrument(skip(self, token, activity))]
    pub async fn update_activity(
        &self,
        token: Option<&SecretString>,
        id: &ActivityId,
        activity: &TheatreActivity,
    ) -> Result<(), ApiError> {
        Self::send_empty(
            self.request(Method::PUT, &activity_path(id), token)
                .json(activity),
        )
        .await
    }

    /// Delete an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API refuses the deletion.
    #[instrument(skip(self, token))]
    pub async fn delete_activity(
        &self,
        token: Option<&SecretString>,
        id: &ActivityId,
    ) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &activity_path(id), token)).await
    }
}
