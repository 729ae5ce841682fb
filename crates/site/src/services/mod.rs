//! Business logic services for the site.
//!
//! # Services
//!
//! - `stats` - Overview and landing-page statistics

pub mod stats;
