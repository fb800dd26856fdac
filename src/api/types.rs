//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::model::reference::HOURS_PER_DAY;
use crate::runner::Evaluation;

/// Startup scenario together with its evaluation.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub scenario: ScenarioConfig,
    /// `result`, `issues` and `solutions` at the top level.
    #[serde(flatten)]
    pub evaluation: Evaluation,
}

/// Published hourly reference curves.
#[derive(Debug, Serialize)]
pub struct ReferenceCurves {
    pub grid_co2_g_per_kwh: [f64; HOURS_PER_DAY],
    pub tou_price_eur_per_kwh: [f64; HOURS_PER_DAY],
    /// Cheapest TOU hours, cheapest first.
    pub cheapest_tou_hours: Vec<usize>,
    /// Lowest-carbon hours, cleanest first.
    pub lowest_co2_hours: Vec<usize>,
}

/// Query parameters for the reference curve endpoint.
#[derive(Debug, Deserialize)]
pub struct CurvesQuery {
    /// Number of best hours to list (default 5).
    pub top: Option<usize>,
}

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// One human-readable message per problem.
    pub errors: Vec<String>,
}
