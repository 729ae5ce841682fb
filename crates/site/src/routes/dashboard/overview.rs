//! Dashboard overview: headline figures and the registrations chart.

use askama::Template;
use chrono::NaiveDate;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::NavView;
use crate::routes::dashboard::Tab;
use crate::services::stats::OverviewStats;
use crate::state::AppState;

/// Overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/overview.html")]
pub struct OverviewTemplate {
    pub nav: NavView,
    pub tab: Tab,
    pub tabs: [Tab; 4],
    pub stats: OverviewStats,
}

/// Chart geometry, in viewBox units.
const BAR_WIDTH: usize = 10;
const BAR_GAP: usize = 2;
const CHART_HEIGHT: usize = 100;

/// One column of the registrations chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub x: usize,
    pub y: usize,
    pub height: usize,
    pub date: NaiveDate,
    pub count: usize,
}

impl OverviewTemplate {
    /// Bars scaled so the busiest day fills the chart.
    #[must_use]
    pub fn bars(&self) -> Vec<Bar> {
        let peak = self.stats.peak_registrations();
        self.stats
            .registrations
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let height = if peak == 0 {
                    0
                } else {
                    day.count * CHART_HEIGHT / peak
                };
                Bar {
                    x: i * (BAR_WIDTH + BAR_GAP),
                    y: CHART_HEIGHT - height,
                    height,
                    date: day.date,
                    count: day.count,
                }
            })
            .collect()
    }

    /// Width of the chart's viewBox.
    #[must_use]
    pub fn chart_width(&self) -> usize {
        (self.stats.registrations.len() * (BAR_WIDTH + BAR_GAP)).max(BAR_WIDTH)
    }
}

/// Display the overview.
///
/// # Errors
///
/// Returns an error if any of the three listings cannot be fetched.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let api = state.api();
    let token = session.token();
    let (activities, users, venues) = tokio::try_join!(
        api.list_activities(token),
        api.list_users(token),
        api.list_venues(token),
    )?;

    Ok(OverviewTemplate {
        nav: NavView::from_session(&session),
        tab: Tab::Overview,
        tabs: Tab::ALL,
        stats: OverviewStats::compute(&activities, &users, &venues),
    })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::services::stats::DailyCount;

    fn page(counts: &[usize]) -> OverviewTemplate {
        let registrations = counts
            .iter()
            .zip(1..)
            .map(|(&count, d)| DailyCount {
                date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap_or_default(),
                count,
            })
            .collect();
        OverviewTemplate {
            nav: NavView::default(),
            tab: Tab::Overview,
            tabs: Tab::ALL,
            stats: OverviewStats {
                registrations,
                ..OverviewStats::default()
            },
        }
    }

    #[test]
    fn test_bars_scale_to_busiest_day() {
        let bars = page(&[2, 8]).bars();

        assert_eq!(bars.len(), 2);
        assert_eq!((bars[0].height, bars[0].y), (25, 75));
        assert_eq!((bars[1].height, bars[1].y), (100, 0));
        assert_eq!(bars[1].x, BAR_WIDTH + BAR_GAP);
    }

    #[test]
    fn test_empty_chart_keeps_a_width() {
        let page = page(&[]);
        assert!(page.bars().is_empty());
        assert_eq!(page.chart_width(), BAR_WIDTH);
    }
}
