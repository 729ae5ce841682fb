//! Read-only listings.
//!
//! Each command re-validates the persisted token first, then fetches the
//! collection with it and reuses the site's search/sort/paginate logic.
//!
//! # Usage
//!
//! ```bash
//! afritheatre venues --search nairobi
//! afritheatre activities --sort jobsCreated --desc
//! afritheatre users --search @example.com
//! ```

use afritheatre_site::listing::{ListQuery, Listable, Listing};
use afritheatre_site::session::{admin_only, any_user};

use super::{CliError, CliSession, require};

/// Table options shared by every listing command.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub descending: bool,
    pub page: usize,
}

impl ListOptions {
    fn query(&self) -> ListQuery {
        ListQuery {
            q: self.search.clone().unwrap_or_default(),
            sort: self.sort.clone(),
            dir: self.descending.then(|| "desc".to_string()),
            per_page: Some("100".to_string()),
            page: Some(self.page.max(1).to_string()),
        }
    }
}

fn print<T: Listable>(items: &[T], options: &ListOptions, line: impl Fn(&T) -> String) {
    let listing = Listing::build(items, &options.query());
    for row in &listing.rows {
        tracing::info!("{}", line(row));
    }
    tracing::info!("{} (page {}/{})", listing.showing(), listing.page, listing.pages);
}

fn or_dash(s: Option<&str>) -> &str {
    s.filter(|s| !s.trim().is_empty()).unwrap_or("-")
}

/// List venues. Any signed-in user may run this.
///
/// # Errors
///
/// Returns an error if not signed in or the API call fails.
pub async fn venues(session: &mut CliSession, options: &ListOptions) -> Result<(), CliError> {
    require(session, any_user).await?;
    let venues = session.identity().list_venues(session.token()).await?;

    print(&venues, options, |v| {
        format!(
            "{:<32} {:<16} {:<16} {:>6}",
            v.name,
            v.county,
            or_dash(v.sub_county.as_deref()),
            v.capacity.map_or_else(|| "-".to_string(), |c| c.to_string()),
        )
    });
    Ok(())
}

/// List theatre activities. Admin only.
///
/// # Errors
///
/// Returns an error if not signed in as an admin or the API call fails.
pub async fn activities(session: &mut CliSession, options: &ListOptions) -> Result<(), CliError> {
    require(session, admin_only).await?;
    let activities = session.identity().list_activities(session.token()).await?;

    print(&activities, options, |a| {
        format!(
            "{:<10} {:<32} {:<24} {:<16} jobs={}",
            or_dash(a.date.get(..10).or(Some(&a.date))),
            or_dash(Some(&a.event_name)),
            or_dash(Some(&a.company_name)),
            or_dash(Some(&a.county)),
            or_dash(Some(&a.jobs_created)),
        )
    });
    Ok(())
}

/// List user accounts. Admin only.
///
/// # Errors
///
/// Returns an error if not signed in as an admin or the API call fails.
pub async fn users(session: &mut CliSession, options: &ListOptions) -> Result<(), CliError> {
    require(session, admin_only).await?;
    let users = session.identity().list_users(session.token()).await?;

    print(&users, options, |u| {
        format!(
            "{:<28} {:<32} {:<6} {}",
            u.name,
            u.email,
            u.role.as_ref().map_or("-", |r| r.as_str()),
            or_dash(u.created_at.as_deref().and_then(|d| d.get(..10))),
        )
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_map_to_query() {
        let options = ListOptions {
            search: Some("nairobi".to_string()),
            sort: Some("capacity".to_string()),
            descending: true,
            page: 0,
        };

        let query = options.query();

        assert_eq!(query.q, "nairobi");
        assert_eq!(query.dir.as_deref(), Some("desc"));
        assert_eq!(query.per_page(), 100);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(or_dash(Some("Kisumu")), "Kisumu");
    }
}
