//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, signed cookie)
//! 5. Security headers (CSP, frame options, etc.)
//! 6. Rate limiting on sign-in and sign-up (governor)
//!
//! Authentication is not a layer: handlers opt in through the
//! [`CurrentSession`], [`RequireUser`] and [`RequireAdmin`] extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AuthRejection, CurrentSession, RequireAdmin, RequireUser, SessionTokenStore, WebSession,
    web_session,
};
pub use rate_limit::{form_rate_limiter, upload_rate_limiter};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
