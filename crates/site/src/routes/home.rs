//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::{ApiClient, TheatreActivity};
use crate::filters;
use crate::middleware::CurrentSession;
use crate::routes::NavView;
use crate::services::stats::{LandingStats, fallback_activities};
use crate::state::AppState;

/// Events shown in the home page strip.
const LATEST_EVENTS: usize = 3;

/// A research pillar highlighted under the hero.
pub struct Pillar {
    pub title: &'static str,
    pub body: &'static str,
}

const PILLARS: [Pillar; 3] = [
    Pillar {
        title: "Research",
        body: "We document theatre activity across Kenya's counties to build an evidence base for the sector.",
    },
    Pillar {
        title: "Data",
        body: "Companies record performances, venues and jobs created so trends can be measured over time.",
    },
    Pillar {
        title: "Advocacy",
        body: "Reports and publications turn the numbers into arguments for funding and policy.",
    },
];

/// A downloadable resource category.
pub struct Resource {
    pub title: &'static str,
    pub description: &'static str,
}

const RESOURCES: [Resource; 6] = [
    Resource {
        title: "Case Studies",
        description: "Real-world examples and success stories from industry leaders",
    },
    Resource {
        title: "Books",
        description: "Essential reading materials recommended by experts",
    },
    Resource {
        title: "Reports",
        description: "In-depth analysis and research findings",
    },
    Resource {
        title: "Magazines",
        description: "Latest industry trends and thought leadership",
    },
    Resource {
        title: "Tools",
        description: "Handy utilities and software to boost your workflow",
    },
    Resource {
        title: "Whitepapers",
        description: "Technical documents and authoritative reports",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: NavView,
    pub stats: LandingStats,
    pub events: Vec<TheatreActivity>,
    pub pillars: &'static [Pillar],
    pub resources: &'static [Resource],
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> impl IntoResponse {
    let (stats, activities) = landing(state.api()).await;
    HomeTemplate {
        nav: NavView::from_session(&session),
        stats,
        events: latest_events(activities, LATEST_EVENTS),
        pillars: &PILLARS,
        resources: &RESOURCES,
    }
}

/// Live landing statistics and activities, or the built-in sample data if
/// either call fails.
async fn landing(api: &ApiClient) -> (LandingStats, Vec<TheatreActivity>) {
    match tokio::try_join!(api.list_public_activities(), api.list_public_venues()) {
        Ok((activities, venues)) => (LandingStats::live(&activities, &venues), activities),
        Err(e) => {
            tracing::warn!(error = %e, "Landing statistics unavailable, using sample data");
            (LandingStats::fallback(), fallback_activities())
        }
    }
}

/// The `limit` most recent named events, newest first. Undated events go last.
fn latest_events(mut activities: Vec<TheatreActivity>, limit: usize) -> Vec<TheatreActivity> {
    activities.retain(|a| !a.event_name.trim().is_empty());
    // `YYYY-MM-DD` sorts lexically; empty dates compare lowest
    activities.sort_by(|a, b| b.date.cmp(&a.date));
    activities.truncate(limit);
    activities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, date: &str) -> TheatreActivity {
        TheatreActivity {
            event_name: name.to_string(),
            date: date.to_string(),
            ..TheatreActivity::default()
        }
    }

    #[test]
    fn test_latest_events_newest_first() {
        let events = latest_events(
            vec![
                event("Old", "2023-01-10"),
                event("Undated", ""),
                event("New", "2024-06-01"),
                event("", "2025-01-01"),
                event("Mid", "2024-02-14"),
            ],
            3,
        );

        let names: Vec<&str> = events.iter().map(|e| e.event_name.as_str()).collect();
        assert_eq!(names, ["New", "Mid", "Old"]);
    }

    #[test]
    fn test_latest_events_keeps_undated_when_short() {
        let events = latest_events(vec![event("Undated", ""), event("Dated", "2024-01-01")], 3);

        assert_eq!(events.len(), 2);
        assert_eq!(events.last().map(|e| e.event_name.as_str()), Some("Undated"));
    }
}
