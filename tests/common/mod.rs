//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use ev_fleet_model::model::{ModelInputs, ModelResult, RawInputs, evaluate};

/// Tolerance for derived floating-point figures.
pub const EPS: f64 = 1e-6;

/// Baseline inputs: 10 trucks, 500 kWh, SoC 0.2 -> 1.0, window 06-20.
pub fn baseline_raw() -> RawInputs {
    RawInputs::default()
}

/// Baseline inputs with a different fleet size.
pub fn with_fleet(fleet_size: i64) -> RawInputs {
    RawInputs {
        fleet_size,
        ..baseline_raw()
    }
}

/// Evaluates raw inputs after clamping.
pub fn eval(raw: &RawInputs) -> ModelResult {
    evaluate(&ModelInputs::new(raw))
}

/// A depot whose peak stays close to its average load.
pub fn smooth_site() -> RawInputs {
    RawInputs {
        charger_power_kw: 30.0,
        ..baseline_raw()
    }
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPS.max(expected.abs() * 1e-9),
        "{what}: expected {expected}, got {actual}"
    );
}
