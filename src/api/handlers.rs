//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::debug;

use super::AppState;
use super::types::{CurvesQuery, ErrorResponse, ReferenceCurves, StateResponse};
use crate::config::ScenarioConfig;
use crate::model::reference::{
    GRID_CO2_G_PER_KWH, HOURS_PER_DAY, TOU_PRICE_EUR_PER_KWH, lowest_hours,
};
use crate::runner::run_scenario;

const DEFAULT_TOP_HOURS: usize = 5;

/// Returns the startup scenario and its evaluation.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        scenario: state.scenario.clone(),
        evaluation: state.evaluation.clone(),
    })
}

/// Evaluates a posted scenario.
///
/// `POST /evaluate` with a `ScenarioConfig` JSON body → 200 + evaluation
/// JSON; non-finite values or bad heuristics → 422 + `ErrorResponse`.
/// Missing sections and fields take their defaults.
pub async fn post_evaluate(Json(scenario): Json<ScenarioConfig>) -> impl IntoResponse {
    let errors = scenario.validate();
    if !errors.is_empty() {
        debug!(errors = errors.len(), "rejected scenario");
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                errors: errors.iter().map(ToString::to_string).collect(),
            }),
        ));
    }
    Ok(Json(run_scenario(&scenario)))
}

/// Returns the reference curves and their best hours.
///
/// `GET /reference-curves` → 200 + `ReferenceCurves` JSON
/// `GET /reference-curves?top=N` → N best hours (1..=24)
/// `GET /reference-curves?top=0` → 400 + `ErrorResponse`
pub async fn get_reference_curves(Query(query): Query<CurvesQuery>) -> impl IntoResponse {
    let top = query.top.unwrap_or(DEFAULT_TOP_HOURS);
    if top == 0 || top > HOURS_PER_DAY {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                errors: vec![format!("`top` ({top}) must be in 1..={HOURS_PER_DAY}")],
            }),
        ));
    }

    Ok(Json(ReferenceCurves {
        grid_co2_g_per_kwh: GRID_CO2_G_PER_KWH,
        tou_price_eur_per_kwh: TOU_PRICE_EUR_PER_KWH,
        cheapest_tou_hours: lowest_hours(&TOU_PRICE_EUR_PER_KWH, top),
        lowest_co2_hours: lowest_hours(&GRID_CO2_G_PER_KWH, top),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;

    fn test_state() -> Arc<AppState> {
        let scenario = ScenarioConfig::constrained_site();
        Arc::new(AppState {
            evaluation: run_scenario(&scenario),
            scenario,
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn state_returns_startup_evaluation() {
        let (status, json) = get_json("/state").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["load"]["capacity_ok"], false);
        assert_eq!(json["issues"][0]["id"], "capacity_exceeded");
        assert_eq!(json["scenario"]["site"]["capacity_limit_kva"], 1200.0);
    }

    #[tokio::test]
    async fn reference_curves_top_three() {
        let (status, json) = get_json("/reference-curves?top=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["cheapest_tou_hours"], serde_json::json!([4, 5, 3]));
        assert_eq!(json["lowest_co2_hours"], serde_json::json!([12, 13, 11]));
        assert_eq!(json["tou_price_eur_per_kwh"].as_array().map(Vec::len), Some(24));
    }

    #[tokio::test]
    async fn reference_curves_rejects_zero_top() {
        let (status, json) = get_json("/reference-curves?top=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["errors"][0].as_str().unwrap().contains("top"));
    }
}
