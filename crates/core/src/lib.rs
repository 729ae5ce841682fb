//! Afritheatre Core - Shared types library.
//!
//! This crate provides common types used across all Afritheatre components:
//! - `site` - Public website, sign-in forms and dashboards
//! - `cli` - Command-line client for the Afritheatre API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The records
//! here mirror the JSON shapes served by the remote Afritheatre API, which owns
//! and validates the data.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, roles, and user records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
