//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with live statistics
//! GET  /about                  - About page
//! GET  /events                 - Public theatre activities (q, location, date filters)
//! GET  /venues                 - Public venues (name, location filters)
//! GET  /contact                - Contact form
//! POST /contact                - Contact submission
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the API)
//!
//! # Auth
//! GET  /login                  - Sign-in page
//! POST /login                  - Sign-in action (rate limited)
//! GET  /sign-up                - Sign-up page
//! POST /sign-up                - Sign-up action (rate limited)
//! POST /logout                 - Logout action
//!
//! # Admin dashboard (admin role)
//! GET  /dashboard                          - Overview statistics
//! GET  /dashboard/users                    - User table
//! GET  /dashboard/users/{id}               - Edit user
//! POST /dashboard/users/{id}               - Update user
//! POST /dashboard/users/{id}/delete        - Delete user
//! GET  /dashboard/venues                   - Venue table
//! GET  /dashboard/venues/new               - New venue form
//! POST /dashboard/venues                   - Create venue
//! GET  /dashboard/venues/{id}              - Venue detail
//! GET  /dashboard/venues/{id}/edit         - Edit venue
//! POST /dashboard/venues/{id}              - Update venue
//! POST /dashboard/venues/{id}/delete       - Delete venue
//! GET  /dashboard/activities               - Activity table
//! GET  /dashboard/activities/{id}          - Activity detail
//! GET  /dashboard/activities/{id}/edit     - Edit activity
//! POST /dashboard/activities/{id}          - Update activity
//! POST /dashboard/activities/{id}/delete   - Delete activity
//!
//! # Account (any signed-in user)
//! GET  /account                - Profile
//! GET  /account/{section}      - profile, blog, magazine, book, report
//! GET  /data-collection        - Theatre activity form
//! POST /data-collection        - Submit theatre activity
//! POST /upload                 - Image upload proxy, returns `{ "url": ... }`
//! ```

pub mod account;
pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod data_collection;
pub mod events;
pub mod home;
pub mod pages;
pub mod upload;
pub mod venues;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::api::MAX_UPLOAD_BYTES;
use crate::middleware::{
    WebSession, create_session_layer, form_rate_limiter, request_id_middleware,
    security_headers_middleware, upload_rate_limiter,
};
use crate::state::AppState;

/// Navigation bar state, carried by every page template.
#[derive(Debug, Clone, Default)]
pub struct NavView {
    pub logged_in: bool,
    pub name: String,
    pub is_admin: bool,
}

impl NavView {
    /// Derive the navigation bar from a re-validated session.
    #[must_use]
    pub fn from_session(session: &WebSession) -> Self {
        session.current_user().map_or_else(Self::default, |user| Self {
            logged_in: true,
            name: user.name.clone(),
            is_admin: user.is_admin(),
        })
    }
}

/// Query parameters for error/success banners after a redirect.
#[derive(Debug, Default, serde::Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Build a redirect target carrying a banner message.
#[must_use]
pub fn with_message(path: &str, key: &str, message: &str) -> String {
    format!("{path}?{key}={}", urlencoding::encode(message))
}

/// Create the auth routes router.
///
/// Sign-in and sign-up submissions are rate limited when `rate_limit` is set.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let mut submit = Router::new()
        .route("/login", post(auth::login))
        .route("/sign-up", post(auth::sign_up));
    if rate_limit {
        submit = submit.layer(form_rate_limiter());
    }

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/sign-up", get(auth::sign_up_page))
        .route("/logout", post(auth::logout))
        .merge(submit)
}

/// Create the admin dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::overview::show))
        .route("/users", get(dashboard::users::index))
        .route(
            "/users/{id}",
            get(dashboard::users::edit).post(dashboard::users::update),
        )
        .route("/users/{id}/delete", post(dashboard::users::delete))
        .route(
            "/venues",
            get(dashboard::venues::index).post(dashboard::venues::create),
        )
        .route("/venues/new", get(dashboard::venues::new))
        .route(
            "/venues/{id}",
            get(dashboard::venues::show).post(dashboard::venues::update),
        )
        .route("/venues/{id}/edit", get(dashboard::venues::edit))
        .route("/venues/{id}/delete", post(dashboard::venues::delete))
        .route("/activities", get(dashboard::activities::index))
        .route(
            "/activities/{id}",
            get(dashboard::activities::show).post(dashboard::activities::update),
        )
        .route("/activities/{id}/edit", get(dashboard::activities::edit))
        .route(
            "/activities/{id}/delete",
            post(dashboard::activities::delete),
        )
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/{section}", get(account::section))
}

/// Create all page routes for the site.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    let mut upload = Router::new()
        .route("/upload", post(upload::upload))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024));
    if rate_limit {
        upload = upload.layer(upload_rate_limiter());
    }

    Router::new()
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/events", get(events::index))
        .route("/venues", get(venues::index))
        .route("/contact", get(contact::show).post(contact::submit))
        .route(
            "/data-collection",
            get(data_collection::show).post(data_collection::submit),
        )
        .merge(upload)
        .merge(auth_routes(rate_limit))
        .nest("/dashboard", dashboard_routes())
        .nest("/account", account_routes())
        .fallback(pages::not_found)
}

/// Assemble the full application: routes, static files and middleware.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// rate limiting can fall back to the peer address.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let rate_limit = state.config().rate_limit;

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes(rate_limit))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(from_fn(security_headers_middleware))
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the Afritheatre API is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.api().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "API not reachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_message_encodes() {
        assert_eq!(
            with_message("/login", "error", "Invalid email or password"),
            "/login?error=Invalid%20email%20or%20password"
        );
    }

    #[test]
    fn test_nav_defaults_to_anonymous() {
        let nav = NavView::default();
        assert!(!nav.logged_in);
        assert!(!nav.is_admin);
    }
}
