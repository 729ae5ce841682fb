//! Dashboard and landing-page statistics.
//!
//! Pure functions over already-fetched records. Fetching (and the landing
//! page's fallback when the API is down) lives in the route handlers.

use std::collections::{BTreeMap, HashSet};

use afritheatre_core::UserRecord;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::{TheatreActivity, Venue};
use crate::listing::leading_int;

/// Blog posts published (not yet served by the API).
pub const TOTAL_BLOGS: usize = 24;

/// Research reports published (not yet served by the API).
pub const TOTAL_REPORTS: usize = 15;

/// Figures shown on the admin overview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewStats {
    pub companies: usize,
    pub counties: usize,
    pub jobs_created: i64,
    pub users: usize,
    pub venues: usize,
    pub events: usize,
    pub blogs: usize,
    pub reports: usize,
    /// New accounts per day, oldest first.
    pub registrations: Vec<DailyCount>,
}

/// Number of registrations on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

impl OverviewStats {
    /// Compute every overview figure.
    #[must_use]
    pub fn compute(activities: &[TheatreActivity], users: &[UserRecord], venues: &[Venue]) -> Self {
        let companies = activities
            .iter()
            .map(|a| a.company_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        let counties = activities
            .iter()
            .map(|a| a.county.as_str())
            .filter(|c| !c.is_empty())
            .collect::<HashSet<_>>()
            .len();
        let jobs_created = activities
            .iter()
            .map(|a| leading_int(&a.jobs_created).unwrap_or(0))
            .fold(0_i64, i64::saturating_add);

        Self {
            companies,
            counties,
            jobs_created,
            users: users.len(),
            venues: venues.len(),
            events: activities.len(),
            blogs: TOTAL_BLOGS,
            reports: TOTAL_REPORTS,
            registrations: registrations_per_day(users),
        }
    }

    /// Largest daily count, for scaling the chart bars.
    #[must_use]
    pub fn peak_registrations(&self) -> usize {
        self.registrations.iter().map(|d| d.count).max().unwrap_or(0)
    }
}

/// Figures shown on the public home page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingStats {
    pub venues: usize,
    pub events: usize,
    pub reports: usize,
    pub blogs: usize,
    /// `true` when the figures come from the built-in sample data.
    pub fallback: bool,
}

impl LandingStats {
    /// Figures from live API data.
    #[must_use]
    pub const fn live(activities: &[TheatreActivity], venues: &[Venue]) -> Self {
        Self {
            venues: venues.len(),
            events: activities.len(),
            reports: TOTAL_REPORTS,
            blogs: TOTAL_BLOGS,
            fallback: false,
        }
    }

    /// Figures from [`fallback_activities`] and [`fallback_venues`].
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            fallback: true,
            ..Self::live(&fallback_activities(), &fallback_venues())
        }
    }
}

/// Sample activities shown when the API cannot be reached.
#[must_use]
pub fn fallback_activities() -> Vec<TheatreActivity> {
    vec![
        TheatreActivity {
            company_name: "Static Theatre Company".to_string(),
            county: "Static County".to_string(),
            jobs_created: "10".to_string(),
            event_name: "Fallback Performance".to_string(),
            ..TheatreActivity::default()
        },
        TheatreActivity {
            company_name: "Backup Theatre Group".to_string(),
            county: "Backup County".to_string(),
            jobs_created: "5".to_string(),
            event_name: "Sample Show".to_string(),
            ..TheatreActivity::default()
        },
    ]
}

/// Sample venues shown when the API cannot be reached.
#[must_use]
pub fn fallback_venues() -> Vec<Venue> {
    vec![
        Venue {
            county: "Static County".to_string(),
            name: "Main Auditorium".to_string(),
            capacity: Some(500),
            ..Venue::default()
        },
        Venue {
            county: "Backup County".to_string(),
            name: "Community Hall".to_string(),
            capacity: Some(200),
            ..Venue::default()
        },
    ]
}

/// Calendar day (UTC) of an API timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]`, or a bare date.
#[must_use]
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc().date())
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

/// Count users per registration day; unparsable or missing dates are skipped.
#[must_use]
pub fn registrations_per_day(users: &[UserRecord]) -> Vec<DailyCount> {
    let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for user in users {
        match user.created_at.as_deref().map(|s| (s, parse_day(s))) {
            Some((_, Some(day))) => *days.entry(day).or_default() += 1,
            Some((raw, None)) => tracing::debug!(created_at = raw, "Skipping invalid date"),
            None => {}
        }
    }
    days.into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}
