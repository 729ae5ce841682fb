//! Authentication middleware and extractors.
//!
//! Each request mounts a fresh [`SessionManager`] over the visitor's cookie
//! session and runs `check_auth` before the handler sees it. Role-gated
//! handlers use [`RequireAdmin`] or [`RequireUser`], which apply the shared
//! guard and turn a denial into a redirect (HTML) or a status code (JSON).

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::ACCEPT, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::{ExposeSecret, SecretString};
use tower_sessions::Session;

use afritheatre_core::UserRecord;

use crate::api::ApiClient;
use crate::error::set_sentry_user;
use crate::session::{Access, SessionManager, TokenStore, admin_only, any_user};
use crate::state::AppState;

/// Session key holding the bearer token.
pub const TOKEN_SESSION_KEY: &str = "auth_token";

/// Session manager as used by the web front-end.
pub type WebSession = SessionManager<SessionTokenStore, ApiClient>;

/// Token slot backed by the visitor's cookie session.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    /// Wrap a tower session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl TokenStore for SessionTokenStore {
    async fn load(&self) -> Option<SecretString> {
        match self.session.get::<String>(TOKEN_SESSION_KEY).await {
            Ok(token) => token.map(SecretString::from),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read token from session");
                None
            }
        }
    }

    async fn save(&self, token: &SecretString) {
        // New login, new session id
        if let Err(e) = self.session.cycle_id().await {
            tracing::warn!(error = %e, "Failed to cycle session id");
        }
        if let Err(e) = self
            .session
            .insert(TOKEN_SESSION_KEY, token.expose_secret())
            .await
        {
            tracing::error!(error = %e, "Failed to persist token in session");
        }
    }

    async fn clear(&self) {
        if let Err(e) = self.session.remove::<String>(TOKEN_SESSION_KEY).await {
            tracing::warn!(error = %e, "Failed to remove token from session");
        }
    }
}

/// Build a manager in the `Initializing` state without contacting the API.
#[must_use]
pub fn web_session(session: Session, api: ApiClient) -> WebSession {
    SessionManager::new(SessionTokenStore::new(session), api)
}

/// Why a request was turned away.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Logged in but lacking the role; send home (for HTML requests).
    RedirectHome,
    /// Unauthorized response (for JSON requests).
    Unauthorized,
    /// Forbidden response (for JSON requests).
    Forbidden,
    /// Re-validation still running: render nothing.
    Pending,
    /// The session layer is missing from the router.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
            Self::Pending => StatusCode::NO_CONTENT.into_response(),
            Self::SessionUnavailable => {
                tracing::error!("Session layer missing from router");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// `true` for requests that expect JSON rather than a page.
fn wants_json(parts: &Parts) -> bool {
    let path = parts.uri.path();
    path.starts_with("/api/")
        || path == "/upload"
        || parts
            .headers
            .get(ACCEPT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"))
}

/// Map a guard decision onto a rejection.
fn reject(access: &Access<'_>, json: bool) -> Option<AuthRejection> {
    match (access, json) {
        (Access::Allowed(_), _) => None,
        (Access::Pending, _) => Some(AuthRejection::Pending),
        (Access::LoginRequired, false) => Some(AuthRejection::RedirectToLogin),
        (Access::LoginRequired, true) => Some(AuthRejection::Unauthorized),
        (Access::Forbidden, false) => Some(AuthRejection::RedirectHome),
        (Access::Forbidden, true) => Some(AuthRejection::Forbidden),
    }
}

/// The visitor's session after startup re-validation.
///
/// Never rejects for anonymous visitors; pages use it to render the
/// navigation bar.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentSession(session): CurrentSession) -> impl IntoResponse {
///     match session.current_user() {
///         Some(user) => format!("Hello, {}!", user.name),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentSession(pub WebSession);

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::SessionUnavailable)?;
        let app = AppState::from_ref(state);

        let mut manager = web_session(session, app.api().clone());
        // Failures already collapsed to Anonymous
        if manager.check_auth().await.is_ok()
            && let Some(user) = manager.current_user()
        {
            set_sentry_user(user);
        }

        Ok(Self(manager))
    }
}

async fn require<S, F>(
    parts: &mut Parts,
    state: &S,
    allowed: F,
) -> Result<WebSession, AuthRejection>
where
    AppState: FromRef<S>,
    S: Send + Sync,
    F: FnOnce(&UserRecord) -> bool + Send,
{
    let CurrentSession(manager) = CurrentSession::from_request_parts(parts, state).await?;
    let rejection = reject(&manager.authorize(allowed), wants_json(parts));
    rejection.map_or(Ok(manager), Err)
}

/// Extractor that requires an authenticated admin.
pub struct RequireAdmin(pub WebSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require(parts, state, admin_only).await.map(Self)
    }
}

/// Extractor that requires any authenticated user.
pub struct RequireUser(pub WebSession);

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require(parts, state, any_user).await.map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use afritheatre_core::{Email, Role};
    use axum::http::Request;

    use super::*;

    fn parts(uri: &str, accept: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_wants_json() {
        assert!(wants_json(&parts("/upload", None)));
        assert!(wants_json(&parts("/dashboard", Some("application/json"))));
        assert!(!wants_json(&parts("/dashboard", Some("text/html"))));
    }

    #[test]
    fn test_reject_mapping() {
        let user = UserRecord::new("Bo".to_string(), Email::parse("b@x.com").unwrap())
            .with_role(Role::User);

        assert!(reject(&Access::Allowed(&user), false).is_none());
        assert!(matches!(
            reject(&Access::LoginRequired, false),
            Some(AuthRejection::RedirectToLogin)
        ));
        assert!(matches!(
            reject(&Access::LoginRequired, true),
            Some(AuthRejection::Unauthorized)
        ));
        assert!(matches!(
            reject(&Access::Forbidden, false),
            Some(AuthRejection::RedirectHome)
        ));
        assert!(matches!(
            reject(&Access::Pending, true),
            Some(AuthRejection::Pending)
        ));
    }

    #[test]
    fn test_rejection_responses() {
        let login = AuthRejection::RedirectToLogin.into_response();
        assert_eq!(login.headers().get("location").unwrap(), "/login");

        let home = AuthRejection::RedirectHome.into_response();
        assert_eq!(home.headers().get("location").unwrap(), "/");

        assert_eq!(
            AuthRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
