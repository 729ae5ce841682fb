//! Search, sort and pagination for dashboard tables.
//!
//! One implementation serves users, venues and theatre activities. Each
//! entity declares its searchable fields and sortable columns through
//! [`Listable`]; query-string state arrives as [`ListQuery`].

use std::cmp::Ordering;

use afritheatre_core::UserRecord;
use serde::Deserialize;

use crate::api::{TheatreActivity, Venue};

/// Page sizes offered by the table footer.
pub const PAGE_SIZES: [usize; 5] = [5, 10, 20, 50, 100];

/// Page size used when none (or an unsupported one) is requested.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Query-string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// A sortable column of some entity.
pub trait Column: Copy + Eq + std::fmt::Debug + 'static {
    /// Every column, in display order.
    const ALL: &'static [Self];

    /// Query-string name.
    fn name(self) -> &'static str;

    /// Header label.
    fn label(self) -> &'static str;

    /// Parse a query-string name.
    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == s)
    }
}

/// Active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<C> {
    pub column: C,
    pub direction: Direction,
}

impl<C: Column> Sort<C> {
    /// Sort that clicking `column` produces from `current`.
    ///
    /// Clicking the column that is already ascending flips it to descending;
    /// anything else starts ascending.
    #[must_use]
    pub fn toggle(current: Option<Self>, column: C) -> Self {
        let direction = match current {
            Some(sort) if sort.column == column && sort.direction == Direction::Ascending => {
                Direction::Descending
            }
            _ => Direction::Ascending,
        };
        Self { column, direction }
    }
}

/// A value to order rows by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    /// Field absent or empty.
    Missing,
    Number(i64),
    Text(&'a str),
}

impl<'a> SortValue<'a> {
    /// Text, or `Missing` when blank.
    #[must_use]
    pub fn text(s: &'a str) -> Self {
        if s.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(s)
        }
    }

    fn cmp_present(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

/// Order two values; missing values go last ascending and first descending.
#[must_use]
pub fn compare(a: &SortValue<'_>, b: &SortValue<'_>, direction: Direction) -> Ordering {
    let ascending = direction == Direction::Ascending;
    match (a, b) {
        (SortValue::Missing, SortValue::Missing) => Ordering::Equal,
        (SortValue::Missing, _) if ascending => Ordering::Greater,
        (SortValue::Missing, _) => Ordering::Less,
        (_, SortValue::Missing) if ascending => Ordering::Less,
        (_, SortValue::Missing) => Ordering::Greater,
        _ if ascending => a.cmp_present(b),
        _ => a.cmp_present(b).reverse(),
    }
}

/// An entity that can be shown in a dashboard table.
pub trait Listable {
    type Column: Column;

    /// Fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Value of `column` for this row.
    fn sort_value(&self, column: Self::Column) -> SortValue<'_>;

    /// Case-insensitive substring match against every search field.
    fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Table state carried in the query string.
///
/// Every field is optional and parsed leniently: an unparsable value falls
/// back to the default instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    /// Requested page size, if it is one of [`PAGE_SIZES`].
    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .filter(|n| PAGE_SIZES.contains(n))
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Requested 1-based page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Requested sort, if the column exists.
    #[must_use]
    pub fn sort<C: Column>(&self) -> Option<Sort<C>> {
        let column = C::parse(self.sort.as_deref()?)?;
        let direction = self
            .dir
            .as_deref()
            .and_then(Direction::parse)
            .unwrap_or(Direction::Ascending);
        Some(Sort { column, direction })
    }
}

/// One page of a filtered, sorted table.
#[derive(Debug)]
pub struct Listing<'a, T: Listable> {
    pub rows: Vec<&'a T>,
    /// Rows matching the search, across all pages.
    pub matched: usize,
    pub page: usize,
    pub pages: usize,
    pub per_page: usize,
    pub sort: Option<Sort<T::Column>>,
    pub search: String,
}

impl<'a, T: Listable> Listing<'a, T> {
    /// Apply `query` to `items`.
    #[must_use]
    pub fn build(items: &'a [T], query: &ListQuery) -> Self {
        let mut rows: Vec<&T> = items.iter().filter(|item| item.matches(&query.q)).collect();

        let sort = query.sort::<T::Column>();
        if let Some(sort) = sort {
            rows.sort_by(|a, b| {
                compare(
                    &a.sort_value(sort.column),
                    &b.sort_value(sort.column),
                    sort.direction,
                )
            });
        }

        let matched = rows.len();
        let per_page = query.per_page();
        let pages = matched.div_ceil(per_page).max(1);
        let page = query.page().min(pages);
        let rows = rows
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            rows,
            matched,
            page,
            pages,
            per_page,
            sort,
            search: query.q.trim().to_string(),
        }
    }

    /// Footer text, e.g. `Showing 10 of 42`.
    #[must_use]
    pub fn showing(&self) -> String {
        format!("Showing {} of {}", self.rows.len(), self.matched)
    }

    /// Header links for every column, reflecting the toggle rule.
    #[must_use]
    pub fn headers(&self) -> Vec<ColumnHeader> {
        T::Column::ALL
            .iter()
            .map(|&column| {
                let next = Sort::toggle(self.sort, column);
                let indicator = match self.sort {
                    Some(sort) if sort.column == column => match sort.direction {
                        Direction::Ascending => "▲",
                        Direction::Descending => "▼",
                    },
                    _ => "",
                };
                ColumnHeader {
                    label: column.label(),
                    query: self.query_string(Some(next), self.per_page, 1),
                    indicator,
                }
            })
            .collect()
    }

    /// Query string for another page with the same search and sort.
    #[must_use]
    pub fn page_query(&self, page: usize) -> String {
        self.query_string(self.sort, self.per_page, page)
    }

    /// Query string for another page size, back on page 1.
    #[must_use]
    pub fn per_page_query(&self, per_page: usize) -> String {
        self.query_string(self.sort, per_page, 1)
    }

    /// Pager links, one per page.
    #[must_use]
    pub fn page_links(&self) -> Vec<PageLink> {
        (1..=self.pages)
            .map(|number| PageLink {
                number,
                query: self.page_query(number),
                current: number == self.page,
            })
            .collect()
    }

    /// Page-size picker links, one per entry in [`PAGE_SIZES`].
    #[must_use]
    pub fn page_size_links(&self) -> Vec<PageLink> {
        PAGE_SIZES
            .iter()
            .map(|&number| PageLink {
                number,
                query: self.per_page_query(number),
                current: number == self.per_page,
            })
            .collect()
    }

    fn query_string(&self, sort: Option<Sort<T::Column>>, per_page: usize, page: usize) -> String {
        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("q={}", urlencoding::encode(&self.search)));
        }
        if let Some(sort) = sort {
            parts.push(format!("sort={}", sort.column.name()));
            parts.push(format!("dir={}", sort.direction.as_str()));
        }
        parts.push(format!("per_page={per_page}"));
        parts.push(format!("page={page}"));
        format!("?{}", parts.join("&"))
    }
}

/// A clickable column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub label: &'static str,
    /// Query string that applies the toggled sort.
    pub query: String,
    /// `▲`, `▼`, or empty when not the active column.
    pub indicator: &'static str,
}

/// A pager or page-size link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub query: String,
    pub current: bool,
}

/// Parse the leading integer of a string, like a lenient form field.
///
/// `"12 staff"` is 12, `"-3"` is -3, `"abc"` and `""` are `None`.
#[must_use]
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, s.get(1..).unwrap_or("")),
        Some(b'+') => (1, s.get(1..).unwrap_or("")),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits.get(..end)?.parse::<i64>().ok().map(|n| sign * n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity tables
// ─────────────────────────────────────────────────────────────────────────────

/// Columns of the users table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Name,
    Email,
    Role,
    Joined,
}

impl Column for UserColumn {
    const ALL: &'static [Self] = &[Self::Name, Self::Email, Self::Role, Self::Joined];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
            Self::Joined => "createdAt",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Role => "Role",
            Self::Joined => "Joined",
        }
    }
}

impl Listable for UserRecord {
    type Column = UserColumn;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn sort_value(&self, column: UserColumn) -> SortValue<'_> {
        match column {
            UserColumn::Name => SortValue::text(&self.name),
            UserColumn::Email => SortValue::text(self.email.as_str()),
            UserColumn::Role => self
                .role
                .as_ref()
                .map_or(SortValue::Missing, |role| SortValue::text(role.as_str())),
            UserColumn::Joined => self
                .created_at
                .as_deref()
                .map_or(SortValue::Missing, SortValue::text),
        }
    }
}

/// Columns of the venues table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueColumn {
    Name,
    County,
    SubCounty,
    Area,
    Capacity,
}

impl Column for VenueColumn {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::County,
        Self::SubCounty,
        Self::Area,
        Self::Capacity,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::County => "county",
            Self::SubCounty => "subCounty",
            Self::Area => "area",
            Self::Capacity => "capacity",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::County => "County",
            Self::SubCounty => "Sub-county",
            Self::Area => "Area",
            Self::Capacity => "Capacity",
        }
    }
}

impl Listable for Venue {
    type Column = VenueColumn;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.county.as_str()];
        fields.extend(self.sub_county.as_deref());
        fields.extend(self.area.as_deref());
        fields
    }

    fn sort_value(&self, column: VenueColumn) -> SortValue<'_> {
        match column {
            VenueColumn::Name => SortValue::text(&self.name),
            VenueColumn::County => SortValue::text(&self.county),
            VenueColumn::SubCounty => self
                .sub_county
                .as_deref()
                .map_or(SortValue::Missing, SortValue::text),
            VenueColumn::Area => self
                .area
                .as_deref()
                .map_or(SortValue::Missing, SortValue::text),
            VenueColumn::Capacity => self
                .capacity
                .map_or(SortValue::Missing, |c| SortValue::Number(i64::from(c))),
        }
    }
}

/// Columns of the theatre activities table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityColumn {
    Event,
    Company,
    County,
    Venue,
    Date,
    Jobs,
}

impl Column for ActivityColumn {
    const ALL: &'static [Self] = &[
        Self::Event,
        Self::Company,
        Self::County,
        Self::Venue,
        Self::Date,
        Self::Jobs,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Event => "eventName",
            Self::Company => "companyName",
            Self::County => "county",
            Self::Venue => "venue",
            Self::Date => "date",
            Self::Jobs => "jobsCreated",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Company => "Company",
            Self::County => "County",
            Self::Venue => "Venue",
            Self::Date => "Date",
            Self::Jobs => "Jobs created",
        }
    }
}

impl Listable for TheatreActivity {
    type Column = ActivityColumn;

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.event_name.as_str(),
            self.company_name.as_str(),
            self.county.as_str(),
            self.venue.as_str(),
        ]
    }

    fn sort_value(&self, column: ActivityColumn) -> SortValue<'_> {
        match column {
            ActivityColumn::Event => SortValue::text(&self.event_name),
            ActivityColumn::Company => SortValue::text(&self.company_name),
            ActivityColumn::County => SortValue::text(&self.county),
            ActivityColumn::Venue => SortValue::text(&self.venue),
            ActivityColumn::Date => SortValue::text(&self.date),
            ActivityColumn::Jobs => {
                leading_int(&self.jobs_created).map_or(SortValue::Missing, SortValue::Number)
            }
        }
    }
}
