//! Cost, emissions and site-load model for electric truck fleets, with
//! issue detection and ranked mitigation options.

/// Issue detection and solution ranking.
pub mod advisor;
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod io;
/// Deterministic fleet model: inputs, hourly profile and result records.
pub mod model;
pub mod runner;
