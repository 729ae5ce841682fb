//! Venue management.
//!
//! The create and edit forms share one template; `action` decides where it
//! posts. The image is uploaded separately through `/upload` and only its URL
//! travels with the form.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use afritheatre_core::VenueId;

use crate::api::Venue;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::forms::{FormErrors, VenueForm};
use crate::listing::{ColumnHeader, ListQuery, Listing};
use crate::middleware::{RequireAdmin, WebSession};
use crate::routes::dashboard::Tab;
use crate::routes::{MessageQuery, NavView, with_message};
use crate::state::AppState;

const VENUES_PATH: &str = "/dashboard/venues";

/// Venue table template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/venues.html")]
pub struct VenuesTemplate<'a> {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub listing: Listing<'a, Venue>,
    pub headers: Vec<ColumnHeader>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Venue detail template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/venue_show.html")]
pub struct VenueShowTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub id: VenueId,
    pub venue: Venue,
}

/// Venue create/edit template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/venue_form.html")]
pub struct VenueFormTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub title: &'static str,
    pub action: String,
    pub form: VenueForm,
    pub errors: FormErrors,
    pub error: Option<String>,
}

impl VenueFormTemplate {
    fn new(session: &WebSession, id: Option<&VenueId>, form: VenueForm) -> Self {
        let (title, action) = match id {
            Some(id) => ("Edit Venue", format!("{VENUES_PATH}/{id}")),
            None => ("Add Venue", VENUES_PATH.to_string()),
        };
        Self {
            nav: NavView::from_session(session),
            tab: Tab::Venues,
            tabs: Tab::ALL,
            title,
            action,
            form,
            errors: FormErrors::default(),
            error: None,
        }
    }
}

fn form_from(venue: Venue) -> VenueForm {
    VenueForm {
        county: venue.county,
        sub_county: venue.sub_county.unwrap_or_default(),
        area: venue.area.unwrap_or_default(),
        name: venue.name,
        capacity: venue.capacity.map(|c| c.to_string()).unwrap_or_default(),
        map_link: venue.map_link.unwrap_or_default(),
        image_url: venue.image_url.unwrap_or_default(),
    }
}

/// Searchable, sortable venue table.
///
/// # Errors
///
/// Returns an error if the venue list cannot be fetched.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Query(query): Query<ListQuery>,
    Query(flash): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let venues = state.api().list_venues(session.token()).await?;
    let listing = Listing::build(&venues, &query);

    Ok(VenuesTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Venues,
        tabs: Tab::ALL,
        headers: listing.headers(),
        listing,
        error: flash.error,
        success: flash.success,
    }
    .into_response())
}

/// Empty venue form.
#[instrument(skip_all)]
pub async fn new(RequireAdmin(session): RequireAdmin) -> impl IntoResponse {
    VenueFormTemplate::new(&session, None, VenueForm::default())
}

/// Create a venue.
#[instrument(skip_all, fields(venue = %form.name))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Form(form): Form<VenueForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let mut page = VenueFormTemplate::new(&session, None, form);
            page.errors = errors;
            return page.into_response();
        }
    };

    match state.api().create_venue(session.token(), &input).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Created venue", Some(&[("venue", input.name.as_str())]));
            Redirect::to(&with_message(VENUES_PATH, "success", "Venue added successfully"))
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Venue creation failed");
            let mut page = VenueFormTemplate::new(&session, None, form);
            page.error = Some(e.user_message("Failed to add venue"));
            page.into_response()
        }
    }
}

/// One venue's details.
///
/// # Errors
///
/// Returns 404 if the venue does not exist.
#[instrument(skip_all, fields(venue_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<VenueId>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.api().get_venue(session.token(), &id).await?;
    Ok(VenueShowTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Venues,
        tabs: Tab::ALL,
        id,
        venue,
    })
}

/// Edit form prefilled from the API.
///
/// # Errors
///
/// Returns 404 if the venue does not exist.
#[instrument(skip_all, fields(venue_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<VenueId>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.api().get_venue(session.token(), &id).await?;
    Ok(VenueFormTemplate::new(&session, Some(&id), form_from(venue)))
}

/// Save a venue edit.
#[instrument(skip_all, fields(venue_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<VenueId>,
    Form(form): Form<VenueForm>,
) -> Response {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let mut page = VenueFormTemplate::new(&session, Some(&id), form);
            page.errors = errors;
            return page.into_response();
        }
    };

    match state.api().update_venue(session.token(), &id, &input).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Updated venue", Some(&[("venue_id", id.as_str())]));
            Redirect::to(&with_message(VENUES_PATH, "success", "Venue updated successfully"))
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Venue update failed");
            let mut page = VenueFormTemplate::new(&session, Some(&id), form);
            page.error = Some(e.user_message("Failed to update venue"));
            page.into_response()
        }
    }
}

/// Delete a venue and return to the table.
#[instrument(skip_all, fields(venue_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<VenueId>,
) -> Redirect {
    match state.api().delete_venue(session.token(), &id).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Deleted venue", Some(&[("venue_id", id.as_str())]));
            Redirect::to(&with_message(VENUES_PATH, "success", "Venue deleted successfully"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Venue deletion failed");
            Redirect::to(&with_message(
                VENUES_PATH,
                "error",
                &e.user_message("Failed to delete venue"),
            ))
        }
    }
}
