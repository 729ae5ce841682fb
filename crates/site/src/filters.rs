//! Custom Askama template filters.
//!
//! Templates reach these through `use crate::filters;` in the module that
//! declares the template struct.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css.
///
/// The hash is computed at build time from the CSS file content.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Renders blank values as an en dash so table cells never collapse.
///
/// Usage in templates: `{{ venue.area|or_dash }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn or_dash(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let s = value.to_string();
    Ok(if s.trim().is_empty() { "–".to_string() } else { s })
}

/// Keeps only the `YYYY-MM-DD` part of an API timestamp.
///
/// Usage in templates: `{{ user.created_at|day }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn day(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let s = value.to_string();
    Ok(s.get(..10).map_or_else(|| s.clone(), str::to_string))
}
