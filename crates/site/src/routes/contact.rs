//! Contact form route handlers.
//!
//! There is no mail backend: accepted messages are written to the log, which
//! ships them to Sentry as breadcrumbs alongside the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::filters;
use crate::forms::{ContactForm, FormErrors};
use crate::middleware::CurrentSession;
use crate::routes::{MessageQuery, NavView, with_message};

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub nav: NavView,
    pub form: ContactForm,
    pub errors: FormErrors,
    pub success: Option<String>,
}

/// Display the contact form.
#[instrument(skip_all)]
pub async fn show(
    CurrentSession(session): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    ContactTemplate {
        nav: NavView::from_session(&session),
        form: ContactForm::default(),
        errors: FormErrors::default(),
        success: query.success,
    }
}

/// Handle a contact submission.
///
/// Invalid input re-renders the form with the visitor's values and one
/// message per failing field.
#[instrument(skip_all)]
pub async fn submit(
    CurrentSession(session): CurrentSession,
    Form(form): Form<ContactForm>,
) -> Response {
    match form.validate() {
        Ok(message) => {
            tracing::info!(
                name = %message.name,
                email = %message.email,
                subject = %message.subject,
                body = %message.message,
                "Contact message received"
            );
            Redirect::to(&with_message(
                "/contact",
                "success",
                "Thank you! Your message has been sent.",
            ))
            .into_response()
        }
        Err(errors) => ContactTemplate {
            nav: NavView::from_session(&session),
            form,
            errors,
            success: None,
        }
        .into_response(),
    }
}
