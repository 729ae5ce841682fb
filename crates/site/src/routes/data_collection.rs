//! Theatre activity data collection.
//!
//! Any signed-in user may record an activity. The venue dropdown is filled
//! from the public venue list; if that call fails the visitor can still type
//! a new venue.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::api::Venue;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::forms::{ActivityForm, FormErrors};
use crate::middleware::{RequireUser, WebSession};
use crate::routes::{MessageQuery, NavView, with_message};
use crate::state::AppState;

/// Data-collection page template.
#[derive(Template, WebTemplate)]
#[template(path = "data_collection.html")]
pub struct DataCollectionTemplate {
    pub nav: NavView,
    pub form: ActivityForm,
    pub errors: FormErrors,
    pub venues: Vec<Venue>,
    pub error: Option<String>,
    pub success: Option<String>,
}

async fn venue_choices(state: &AppState) -> Vec<Venue> {
    state.api().list_public_venues().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Venue list unavailable for data collection");
        Vec::new()
    })
}

async fn page(
    state: &AppState,
    session: &WebSession,
    form: ActivityForm,
    errors: FormErrors,
    error: Option<String>,
) -> DataCollectionTemplate {
    DataCollectionTemplate {
        nav: NavView::from_session(session),
        form,
        errors,
        venues: venue_choices(state).await,
        error,
        success: None,
    }
}

/// Display the data-collection form.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let mut template = page(
        &state,
        &session,
        ActivityForm::default(),
        FormErrors::default(),
        query.error,
    )
    .await;
    template.success = query.success;
    template
}

/// Handle a data-collection submission.
#[instrument(skip_all, fields(event = %form.event_name))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    Form(form): Form<ActivityForm>,
) -> Response {
    let activity = match form.validate() {
        Ok(activity) => activity,
        Err(errors) => {
            return page(&state, &session, form, errors, None)
                .await
                .into_response();
        }
    };

    match state.api().submit_activity(session.token(), &activity).await {
        Ok(()) => {
            add_breadcrumb(
                "data-collection",
                "Submitted theatre activity",
                Some(&[("event", activity.event_name.as_str())]),
            );
            Redirect::to(&with_message(
                "/data-collection",
                "success",
                "Theatre activity submitted successfully",
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Activity submission failed");
            let message = e.user_message("Failed to submit theatre activity");
            page(&state, &session, form, FormErrors::default(), Some(message))
                .await
                .into_response()
        }
    }
}
