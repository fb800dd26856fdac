//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use ev_fleet_model::api::{AppState, router};
use ev_fleet_model::config::ScenarioConfig;
use ev_fleet_model::runner::run_scenario;

fn build_api_state() -> Arc<AppState> {
    let scenario = ScenarioConfig::baseline();
    Arc::new(AppState {
        evaluation: run_scenario(&scenario),
        scenario,
    })
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let app = router(build_api_state());
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn state_endpoint_matches_cli_evaluation() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/state")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    let expected = serde_json::to_value(run_scenario(&ScenarioConfig::baseline())).unwrap();
    assert_eq!(json["result"], expected["result"]);
    assert_eq!(json["solutions"], expected["solutions"]);
    assert_eq!(json["scenario"]["fleet"]["size"], 10);
}

#[tokio::test]
async fn evaluate_partial_scenario_uses_defaults() {
    let (status, json) = post_json(
        "/evaluate",
        json!({ "site": { "capacity_limit_kva": 1000.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["load"]["new_theoretical_peak_kw"], 1800.0);
    assert_eq!(json["issues"][0]["id"], "capacity_exceeded");
    assert_eq!(json["issues"][0]["severity"], "high");
    let solutions = json["solutions"].as_array().unwrap();
    assert!(solutions.len() <= 3);
    assert!(solutions.iter().all(|s| s["rank_score"].is_number()));
}

#[tokio::test]
async fn evaluate_reports_clamping_notices() {
    let (status, json) = post_json("/evaluate", json!({ "fleet": { "size": -4 } })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["load"]["fleet_size"], 1);
    assert_eq!(json["result"]["notices"][0]["kind"], "clamped");
}

#[tokio::test]
async fn evaluate_rejects_bad_heuristics() {
    let (status, json) = post_json(
        "/evaluate",
        json!({ "heuristics": { "peak_concentration_ratio": -1.0 } }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = json["errors"].as_array().unwrap();
    assert!(
        errors
            .iter()
            .any(|e| e.as_str().unwrap_or("").contains("heuristics.peak_concentration_ratio"))
    );
}

#[tokio::test]
async fn evaluate_rejects_unknown_fields() {
    let (status, _) = post_json("/evaluate", json!({ "solar": { "kw_peak": 5.0 } })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = router(build_api_state());
    let req = Request::builder()
        .uri("/telemetry")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
