//! Image upload proxy.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use super::{ApiClient, ApiError, UploadResponse};

/// Largest accepted upload (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Why an upload was refused before reaching the API.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file was provided")]
    Empty,
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("file is {size} bytes, the limit is {MAX_UPLOAD_BYTES}")]
    TooLarge { size: usize },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A validated image ready to forward.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Validate an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty body, a non-image content type, or a file
    /// larger than [`MAX_UPLOAD_BYTES`].
    pub fn new(
        file_name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let content_type = content_type.trim().to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
            return Err(UploadError::UnsupportedType(content_type));
        }

        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size: bytes.len() });
        }

        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Normalised content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; empty uploads are rejected by [`Self::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ApiClient {
    /// Forward an image to `POST /api/upload` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Api` if the API rejects the file.
    #[instrument(skip(self, token, upload), fields(file = %upload.file_name, size = upload.len()))]
    pub async fn upload_image(
        &self,
        token: Option<&SecretString>,
        upload: ImageUpload,
    ) -> Result<String, UploadError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(ApiError::from)?;
        let form = Form::new().part("file", part);

        let response: UploadResponse =
            Self::send_json(self.request(Method::POST, "/api/upload", token).multipart(form))
                .await?;
        Ok(response.url)
    }
}
