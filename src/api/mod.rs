//! REST API over the fleet model.
//!
//! - `GET /state`: startup scenario and its evaluation
//! - `POST /evaluate`: evaluate a JSON scenario
//! - `GET /reference-curves`: hourly CO₂ and TOU curves with their best hours

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::runner::Evaluation;

pub use types::{ErrorResponse, ReferenceCurves, StateResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; evaluation is pure, so
/// `POST /evaluate` never touches it.
pub struct AppState {
    /// Scenario the server was started with.
    pub scenario: ScenarioConfig,
    /// Evaluation of `scenario`.
    pub evaluation: Evaluation,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/evaluate", post(handlers::post_evaluate))
        .route("/reference-curves", get(handlers::get_reference_curves))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
