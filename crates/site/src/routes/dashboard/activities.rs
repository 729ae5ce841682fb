//! Theatre activity management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use afritheatre_core::ActivityId;

use crate::api::{TheatreActivity, Venue};
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::forms::{ActivityForm, FormErrors};
use crate::listing::{ColumnHeader, ListQuery, Listing};
use crate::middleware::{RequireAdmin, WebSession};
use crate::routes::dashboard::Tab;
use crate::routes::{MessageQuery, NavView, with_message};
use crate::state::AppState;

const ACTIVITIES_PATH: &str = "/dashboard/activities";

/// Activity table template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/activities.html")]
pub struct ActivitiesTemplate<'a> {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub listing: Listing<'a, TheatreActivity>,
    pub headers: Vec<ColumnHeader>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Activity detail template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/activity_show.html")]
pub struct ActivityShowTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub id: ActivityId,
    pub activity: TheatreActivity,
}

/// Activity edit template. Shares its fields with the data-collection form.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/activity_edit.html")]
pub struct ActivityEditTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub id: ActivityId,
    pub form: ActivityForm,
    pub errors: FormErrors,
    /// Edits type the venue by hand, so the dropdown stays empty.
    pub venues: Vec<Venue>,
    pub error: Option<String>,
}

impl ActivityEditTemplate {
    fn new(session: &WebSession, id: ActivityId, form: ActivityForm) -> Self {
        Self {
            nav: NavView::from_session(session),
            tab: Tab::Activities,
            tabs: Tab::ALL,
            id,
            form,
            errors: FormErrors::default(),
            venues: Vec::new(),
            error: None,
        }
    }
}

/// Searchable, sortable activity table.
///
/// # Errors
///
/// Returns an error if the activity list cannot be fetched.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Query(query): Query<ListQuery>,
    Query(flash): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let activities = state.api().list_activities(session.token()).await?;
    let listing = Listing::build(&activities, &query);

    Ok(ActivitiesTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Activities,
        tabs: Tab::ALL,
        headers: listing.headers(),
        listing,
        error: flash.error,
        success: flash.success,
    }
    .into_response())
}

/// One activity's full record.
///
/// # Errors
///
/// Returns 404 if the activity does not exist.
#[instrument(skip_all, fields(activity_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<ActivityId>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state.api().get_activity(session.token(), &id).await?;
    Ok(ActivityShowTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Activities,
        tabs: Tab::ALL,
        id,
        activity,
    })
}

/// Edit form prefilled from the API.
///
/// # Errors
///
/// Returns 404 if the activity does not exist.
#[instrument(skip_all, fields(activity_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<ActivityId>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state.api().get_activity(session.token(), &id).await?;
    Ok(ActivityEditTemplate::new(
        &session,
        id,
        ActivityForm::from_activity(&activity),
    ))
}

/// Save an activity edit.
#[instrument(skip_all, fields(activity_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<ActivityId>,
    Form(form): Form<ActivityForm>,
) -> Response {
    let activity = match form.validate() {
        Ok(activity) => activity,
        Err(errors) => {
            let mut page = ActivityEditTemplate::new(&session, id, form);
            page.errors = errors;
            return page.into_response();
        }
    };

    match state
        .api()
        .update_activity(session.token(), &id, &activity)
        .await
    {
        Ok(()) => {
            add_breadcrumb(
                "dashboard",
                "Updated theatre activity",
                Some(&[("activity_id", id.as_str())]),
            );
            Redirect::to(&with_message(
                ACTIVITIES_PATH,
                "success",
                "Activity updated successfully",
            ))
            .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Activity update failed");
            let mut page = ActivityEditTemplate::new(&session, id, form);
            page.error = Some(e.user_message("Failed to update activity"));
            page.into_response()
        }
    }
}

/// Delete an activity and return to the table.
#[instrument(skip_all, fields(activity_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<ActivityId>,
) -> Redirect {
    match state.api().delete_activity(session.token(), &id).await {
        Ok(()) => {
            add_breadcrumb(
                "dashboard",
                "Deleted theatre activity",
                Some(&[("activity_id", id.as_str())]),
            );
            Redirect::to(&with_message(
                ACTIVITIES_PATH,
                "success",
                "Activity deleted successfully",
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Activity deletion failed");
            Redirect::to(&with_message(
                ACTIVITIES_PATH,
                "error",
                &e.user_message("Failed to delete activity"),
            ))
        }
    }
}
