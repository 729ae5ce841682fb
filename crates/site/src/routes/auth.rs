//! Authentication route handlers.
//!
//! Sign-in exchanges credentials with the Afritheatre API and hands the
//! token and user record to the visitor's [`SessionManager`]; sign-up only
//! registers, then sends the visitor to sign in.
//!
//! [`SessionManager`]: crate::session::SessionManager

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use tracing::instrument;

use crate::api::{ApiError, AuthResponse};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{LoginForm, SignUpForm};
use crate::middleware::CurrentSession;
use crate::routes::{MessageQuery, NavView, with_message};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: NavView,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_up.html")]
pub struct SignUpTemplate {
    pub nav: NavView,
    pub error: Option<String>,
}

/// Message for a failed API call: the API's own text for a rejection,
/// a generic one when the API could not be reached.
fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err.status() {
        Some(_) => err.user_message(fallback),
        None => "Server error".to_string(),
    }
}

// =============================================================================
// Sign-in
// =============================================================================

/// Display the sign-in page.
#[instrument(skip_all)]
pub async fn login_page(
    CurrentSession(session): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        nav: NavView::from_session(&session),
        error: query.error,
        success: query.success,
    }
}

/// Handle sign-in form submission.
///
/// Admins land on `/dashboard`, everyone else on `/`.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return Redirect::to(&with_message("/login", "error", &errors.summary())).into_response();
    }

    match state.api().login(form.email.trim(), &form.password).await {
        Ok(AuthResponse { token, user }) => {
            let destination = if user.is_admin() { "/dashboard" } else { "/" };
            set_sentry_user(&user);
            add_breadcrumb("auth", "Signed in", None);
            tracing::info!(user = %user.email, "User signed in");

            session.login(SecretString::from(token), user).await;
            Redirect::to(destination).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in failed");
            Redirect::to(&with_message(
                "/login",
                "error",
                &failure_message(&e, "Login failed"),
            ))
            .into_response()
        }
    }
}

// =============================================================================
// Sign-up
// =============================================================================

/// Display the sign-up page.
#[instrument(skip_all)]
pub async fn sign_up_page(
    CurrentSession(session): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    SignUpTemplate {
        nav: NavView::from_session(&session),
        error: query.error,
    }
}

/// Handle sign-up form submission.
///
/// Registration does not sign the visitor in.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Response {
    if let Err(errors) = form.validate() {
        return Redirect::to(&with_message("/sign-up", "error", &errors.summary()))
            .into_response();
    }

    match state
        .api()
        .register(
            form.name.trim(),
            form.email.trim(),
            &form.password,
            form.phone.trim(),
        )
        .await
    {
        Ok(()) => {
            tracing::info!(email = %form.email.trim(), "User registered");
            Redirect::to(&with_message(
                "/login",
                "success",
                "Registration successful. Please sign in.",
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            Redirect::to(&with_message(
                "/sign-up",
                "error",
                &failure_message(&e, "Registration failed"),
            ))
            .into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout. Safe to call when already signed out.
#[instrument(skip_all)]
pub async fn logout(CurrentSession(mut session): CurrentSession) -> Redirect {
    session.logout().await;
    clear_sentry_user();
    add_breadcrumb("auth", "Signed out", None);
    Redirect::to("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_api_text() {
        let rejected = ApiError::Status {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(failure_message(&rejected, "Login failed"), "Invalid credentials");

        let bare = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(failure_message(&bare, "Login failed"), "Login failed");
    }

    #[test]
    fn test_failure_message_for_unparsable_body() {
        let err = ApiError::Parse(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(failure_message(&err, "Login failed"), "Server error");
    }
}
