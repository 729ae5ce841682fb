//! Public venues page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::Venue;
use crate::filters;
use crate::middleware::CurrentSession;
use crate::routes::NavView;
use crate::state::AppState;

/// Search bar on the venues page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueFilter {
    pub name: String,
    /// Matched against county, sub-county and area.
    pub location: String,
}

impl VenueFilter {
    /// Does `venue` pass both filters?
    #[must_use]
    pub fn matches(&self, venue: &Venue) -> bool {
        let needle = |s: &str| s.trim().to_lowercase();
        let name = needle(&self.name);
        let location = needle(&self.location);

        venue.name.to_lowercase().contains(&name)
            && [
                Some(venue.county.as_str()),
                venue.sub_county.as_deref(),
                venue.area.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&location))
    }
}

/// Venues page template.
#[derive(Template, WebTemplate)]
#[template(path = "venues.html")]
pub struct VenuesTemplate {
    pub nav: NavView,
    pub filter: VenueFilter,
    pub venues: Vec<Venue>,
    pub error: Option<String>,
}

/// Display public venues.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<VenueFilter>,
) -> impl IntoResponse {
    let (venues, error) = match state.api().list_public_venues().await {
        Ok(all) => (
            all.into_iter().filter(|v| filter.matches(v)).collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load public venues");
            (Vec::new(), Some(e.user_message("Failed to fetch venues")))
        }
    };

    VenuesTemplate {
        nav: NavView::from_session(&session),
        filter,
        venues,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Venue {
        Venue {
            name: "Kenya National Theatre".to_string(),
            county: "Nairobi".to_string(),
            sub_county: Some("Starehe".to_string()),
            area: None,
            ..Venue::default()
        }
    }

    #[test]
    fn test_blank_filter_matches() {
        assert!(VenueFilter::default().matches(&venue()));
    }

    #[test]
    fn test_name_and_location() {
        let by_name = VenueFilter {
            name: "national".to_string(),
            ..VenueFilter::default()
        };
        assert!(by_name.matches(&venue()));

        let by_sub_county = VenueFilter {
            location: "starehe".to_string(),
            ..VenueFilter::default()
        };
        assert!(by_sub_county.matches(&venue()));

        let elsewhere = VenueFilter {
            location: "Kisumu".to_string(),
            ..VenueFilter::default()
        };
        assert!(!elsewhere.matches(&venue()));
    }
}
