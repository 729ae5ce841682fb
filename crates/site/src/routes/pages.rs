//! Static content page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::CurrentSession;
use crate::routes::NavView;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub nav: NavView,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub nav: NavView,
}

/// Display the About page.
#[instrument(skip_all)]
pub async fn about(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    AboutTemplate {
        nav: NavView::from_session(&session),
    }
}

/// Fallback for unknown paths.
pub async fn not_found(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            nav: NavView::from_session(&session),
        },
    )
}
