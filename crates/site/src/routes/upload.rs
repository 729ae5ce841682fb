//! Image upload proxy.
//!
//! Browsers post a multipart `file` field here; the image is checked and
//! forwarded to the API with the visitor's bearer token, and the stored URL
//! comes back as JSON for the venue form to pick up.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::api::{ImageUpload, UploadError};
use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Body returned after a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub url: String,
}

/// Accept one image and return its public URL.
///
/// # Errors
///
/// Returns 400 without a `file` field, 415 for non-images, 413 above the
/// size limit, and 502 when the API rejects the file.
#[instrument(skip_all)]
pub async fn upload(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let image = ImageUpload::new(file_name, &content_type, bytes.to_vec())?;
        let url = state.api().upload_image(session.token(), image).await?;
        tracing::info!(url = %url, "Image uploaded");
        return Ok(Json(UploadResult { url }));
    }

    Err(UploadError::Empty.into())
}
