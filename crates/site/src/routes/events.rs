//! Public events page.
//!
//! Lists publicly visible theatre activities with three independent
//! filters: free text over event and company, location over county and
//! venue, and an exact calendar day.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;

use crate::api::TheatreActivity;
use crate::filters;
use crate::middleware::CurrentSession;
use crate::routes::NavView;
use crate::services::stats::parse_day;
use crate::state::AppState;

/// Filters from the search bar.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub q: String,
    pub location: String,
    /// `YYYY-MM-DD`; anything else disables the date filter.
    pub date: String,
}

impl EventFilter {
    fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// `true` when any filter is set.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.q.trim().is_empty() || !self.location.trim().is_empty() || self.day().is_some()
    }

    /// Does `activity` pass every filter?
    #[must_use]
    pub fn matches(&self, activity: &TheatreActivity) -> bool {
        let contains = |field: &str, needle: &str| {
            field.to_lowercase().contains(&needle.trim().to_lowercase())
        };

        let text =
            contains(&activity.event_name, &self.q) || contains(&activity.company_name, &self.q);
        let location =
            contains(&activity.county, &self.location) || contains(&activity.venue, &self.location);
        let date = self
            .day()
            .is_none_or(|day| parse_day(&activity.date) == Some(day));

        text && location && date
    }
}

/// Events page template.
#[derive(Template, WebTemplate)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub nav: NavView,
    pub filter: EventFilter,
    pub events: Vec<TheatreActivity>,
    pub error: Option<String>,
}

/// Display public events.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    let (events, error) = match state.api().list_public_activities().await {
        Ok(all) => (
            all.into_iter().filter(|a| filter.matches(a)).collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load public events");
            (Vec::new(), Some(e.user_message("Failed to fetch data")))
        }
    };

    EventsTemplate {
        nav: NavView::from_session(&session),
        filter,
        events,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, company: &str, county: &str, venue: &str, date: &str) -> TheatreActivity {
        TheatreActivity {
            event_name: name.to_string(),
            company_name: company.to_string(),
            county: county.to_string(),
            venue: venue.to_string(),
            date: date.to_string(),
            ..TheatreActivity::default()
        }
    }

    fn filter(q: &str, location: &str, date: &str) -> EventFilter {
        EventFilter {
            q: q.to_string(),
            location: location.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let e = event("Kifo Kisimani", "Heva", "Nairobi", "Kenya National Theatre", "");
        assert!(filter("", "", "").matches(&e));
        assert!(!filter("", "", "").is_active());
    }

    #[test]
    fn test_text_matches_event_or_company() {
        let e = event("Kifo Kisimani", "Heva Players", "Nairobi", "KNT", "");
        assert!(filter("kisimani", "", "").matches(&e));
        assert!(filter("HEVA", "", "").matches(&e));
        assert!(!filter("sarakasi", "", "").matches(&e));
    }

    #[test]
    fn test_location_matches_county_or_venue() {
        let e = event("Show", "Co", "Mombasa", "Little Theatre Club", "");
        assert!(filter("", "mombasa", "").matches(&e));
        assert!(filter("", "little theatre", "").matches(&e));
        assert!(!filter("", "kisumu", "").matches(&e));
    }

    #[test]
    fn test_date_compares_calendar_day() {
        let e = event("Show", "Co", "Kisumu", "Hall", "2025-04-12T00:00:00.000Z");
        assert!(filter("", "", "2025-04-12").matches(&e));
        assert!(!filter("", "", "2025-04-13").matches(&e));
        // Unparsable filter is ignored
        assert!(filter("", "", "soon").matches(&e));
    }

    #[test]
    fn test_filters_combine() {
        let e = event("Show", "Co", "Kisumu", "Hall", "2025-04-12");
        assert!(filter("show", "kisumu", "2025-04-12").matches(&e));
        assert!(!filter("show", "nairobi", "2025-04-12").matches(&e));
    }
}
