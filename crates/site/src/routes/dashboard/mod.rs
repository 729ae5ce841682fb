//! Admin dashboard route handlers.
//!
//! Every handler takes [`RequireAdmin`], so anonymous visitors are sent to
//! `/login` and signed-in non-admins to `/`. API calls carry the admin's
//! bearer token from the session.
//!
//! [`RequireAdmin`]: crate::middleware::RequireAdmin

pub mod activities;
pub mod overview;
pub mod users;
pub mod venues;

/// Sidebar entry highlighted on a dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Users,
    Venues,
    Activities,
}

impl Tab {
    /// Every tab, in sidebar order.
    pub const ALL: [Self; 4] = [Self::Overview, Self::Users, Self::Venues, Self::Activities];

    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::Overview => "/dashboard",
            Self::Users => "/dashboard/users",
            Self::Venues => "/dashboard/venues",
            Self::Activities => "/dashboard/activities",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Users => "Users",
            Self::Venues => "Venues",
            Self::Activities => "Theatre Data",
        }
    }
}
