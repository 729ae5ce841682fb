//! Afritheatre Collective web front-end.
//!
//! This crate provides the site as a library, allowing the router to be
//! served by the binary, driven by the integration tests, and the session
//! manager and API client to be reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod listing;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

pub use routes::app;
