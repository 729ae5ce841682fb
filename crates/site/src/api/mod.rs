//! Client for the Afritheatre REST API.
//!
//! # Architecture
//!
//! - The API is the source of truth; every page fetches directly, nothing is
//!   cached or retried
//! - JSON over HTTP via `reqwest`, bearer auth when a token is available
//! - Non-2xx answers carry `{ "message": ... }`, surfaced through
//!   [`ApiError::user_message`]
//!
//! # Example
//!
//! ```rust,ignore
//! use afritheatre_site::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api)?;
//! let session = api.login("a@x.com", "hunter22").await?;
//! let venues = api.list_venues(Some(&session_token)).await?;
//! ```

mod activities;
mod auth;
pub mod types;
mod upload;
mod users;
mod venues;

pub use types::*;
pub use upload::{ImageUpload, MAX_UPLOAD_BYTES, UploadError};

use std::sync::Arc;

use afritheatre_core::UserRecord;
use reqwest::{Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::session::{IdentityError, IdentityProvider};

/// Errors that can occur when calling the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {}", message.as_deref().unwrap_or("(no message)"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// The body's `message` field, when present.
        message: Option<String>,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Text to show a user: the API's own message, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status returned by the API, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// `true` when the API answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the Afritheatre REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("afritheatre/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL every endpoint path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Probe the API host. Any HTTP answer counts as reachable.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` when the host cannot be reached.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.inner.client.get(self.url("/")).send().await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn request(&self, method: Method, path: &str, token: Option<&SecretString>) -> RequestBuilder {
        let builder = self.inner.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send a request and ignore the body of a success response.
    async fn send_empty(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    /// Turn a non-success response into `ApiError::Status`.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message);

        tracing::debug!(status = status.as_u16(), body = %text, "API request failed");

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl IdentityProvider for ApiClient {
    async fn fetch_identity(&self, token: &SecretString) -> Result<UserRecord, IdentityError> {
        let response = self
            .request(Method::GET, "/api/auth/me", Some(token))
            .send()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| IdentityError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(base, Duration::from_secs(1)).unwrap()).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = client("http://localhost:5000/");
        assert_eq!(api.url("/api/venues"), "http://localhost:5000/api/venues");
    }

    #[test]
    fn test_url_keeps_path_prefix() {
        let api = client("https://example.org/backend");
        assert_eq!(
            api.url("/api/auth/me"),
            "https://example.org/backend/api/auth/me"
        );
    }

    #[test]
    fn test_user_message_prefers_api_message() {
        let err = ApiError::Status {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Login failed"), "Login failed");

        let blank = ApiError::Status {
            status: 400,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Login failed"), "Login failed");
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: None,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API returned 404: (no message)");
    }

    #[tokio::test]
    async fn test_unreachable_identity_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{addr}"));
        let result = api.fetch_identity(&SecretString::from("tok")).await;
        assert!(matches!(result, Err(IdentityError::Transport(_))));
    }
}
