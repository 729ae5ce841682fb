//! User management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use afritheatre_core::{UserId, UserRecord};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::forms::{FormErrors, UserForm};
use crate::listing::{ColumnHeader, ListQuery, Listing};
use crate::middleware::{RequireAdmin, WebSession};
use crate::routes::dashboard::Tab;
use crate::routes::{MessageQuery, NavView, with_message};
use crate::state::AppState;

const USERS_PATH: &str = "/dashboard/users";

/// User table template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/users.html")]
pub struct UsersTemplate<'a> {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub listing: Listing<'a, UserRecord>,
    pub headers: Vec<ColumnHeader>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// User edit template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/user_edit.html")]
pub struct UserEditTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub id: UserId,
    pub form: UserForm,
    pub errors: FormErrors,
    pub error: Option<String>,
}

impl UserEditTemplate {
    fn new(session: &WebSession, id: UserId, form: UserForm) -> Self {
        Self {
            nav: NavView::from_session(session),
            tab: Tab::Users,
            tabs: Tab::ALL,
            id,
            form,
            errors: FormErrors::default(),
            error: None,
        }
    }
}

/// Searchable, sortable user table.
///
/// # Errors
///
/// Returns an error if the user list cannot be fetched.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Query(query): Query<ListQuery>,
    Query(flash): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let users = state.api().list_users(session.token()).await?;
    let listing = Listing::build(&users, &query);

    Ok(UsersTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Users,
        tabs: Tab::ALL,
        headers: listing.headers(),
        listing,
        error: flash.error,
        success: flash.success,
    }
    .into_response())
}

/// Edit form for one user.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn edit(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.api().get_user(session.token(), &id).await?;
    let form = UserForm {
        name: user.name,
        email: user.email.to_string(),
        phone: user.phone.unwrap_or_default(),
        role: user.role.map(|r| r.as_str().to_string()).unwrap_or_default(),
    };
    Ok(UserEditTemplate::new(&session, id, form))
}

/// Save a user edit.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<UserId>,
    Form(form): Form<UserForm>,
) -> Response {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            let mut page = UserEditTemplate::new(&session, id, form);
            page.errors = errors;
            return page.into_response();
        }
    };

    match state.api().update_user(session.token(), &id, &update).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Updated user", Some(&[("user_id", id.as_str())]));
            Redirect::to(&with_message(USERS_PATH, "success", "User updated successfully"))
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "User update failed");
            let mut page = UserEditTemplate::new(&session, id, form);
            page.error = Some(e.user_message("Failed to update user"));
            page.into_response()
        }
    }
}

/// Delete a user and return to the table.
#[instrument(skip_all, fields(user_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Path(id): Path<UserId>,
) -> Redirect {
    match state.api().delete_user(session.token(), &id).await {
        Ok(()) => {
            add_breadcrumb("dashboard", "Deleted user", Some(&[("user_id", id.as_str())]));
            Redirect::to(&with_message(USERS_PATH, "success", "User deleted successfully"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "User deletion failed");
            Redirect::to(&with_message(
                USERS_PATH,
                "error",
                &e.user_message("Failed to delete user"),
            ))
        }
    }
}
