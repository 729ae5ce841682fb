//! Account route handlers.
//!
//! The per-user dashboard. These routes require a signed-in user of any role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::Path, response::IntoResponse};
use tracing::instrument;

use afritheatre_core::UserRecord;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireUser, WebSession};
use crate::routes::NavView;

/// A page of the user dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Profile,
    Blog,
    Magazine,
    Book,
    Report,
}

impl Section {
    /// Every section, in sidebar order.
    pub const ALL: [Self; 5] = [
        Self::Profile,
        Self::Blog,
        Self::Magazine,
        Self::Book,
        Self::Report,
    ];

    /// Path segment under `/account`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Blog => "blog",
            Self::Magazine => "magazine",
            Self::Book => "book",
            Self::Report => "report",
        }
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Blog => "Blog",
            Self::Magazine => "Magazine",
            Self::Book => "Book",
            Self::Report => "Report",
        }
    }

    /// Page heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Profile => "User Profile",
            Self::Blog => "User Blog Posts",
            Self::Magazine => "Magazine Contributions",
            Self::Book => "Book Listings",
            Self::Report => "User Reports",
        }
    }

    /// Look up a section by slug.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }
}

/// User dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub nav: NavView,
    pub user: UserRecord,
    pub section: Section,
    pub sections: [Section; 5],
}

fn render(session: &WebSession, section: Section) -> Result<AccountTemplate, AppError> {
    let user = session
        .current_user()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()))?;

    Ok(AccountTemplate {
        nav: NavView::from_session(session),
        user,
        section,
        sections: Section::ALL,
    })
}

/// Display the profile section.
#[instrument(skip_all)]
pub async fn index(RequireUser(session): RequireUser) -> Result<impl IntoResponse, AppError> {
    render(&session, Section::Profile)
}

/// Display a named section.
///
/// # Errors
///
/// Returns 404 for an unknown section.
#[instrument(skip_all, fields(section = %slug))]
pub async fn section(
    RequireUser(session): RequireUser,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let section = Section::from_slug(&slug).ok_or_else(|| AppError::NotFound(slug.clone()))?;
    render(&session, section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_slugs_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_slug(section.slug()), Some(section));
        }
        assert_eq!(Section::from_slug("orders"), None);
    }

    #[test]
    fn test_default_section_is_profile() {
        assert_eq!(Section::default().title(), "User Profile");
    }
}
