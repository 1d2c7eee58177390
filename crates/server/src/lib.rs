//! HTTP front end for FetchFlicks.

pub mod api;
pub mod metrics;
pub mod state;
