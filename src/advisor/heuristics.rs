//! Tunable thresholds and score weights for issue detection and ranking.
//!
//! None of these has a physical derivation; they are defaults that can be
//! overridden from the `[heuristics]` section of a scenario.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Heuristics {
    /// Peak above this multiple of the average load counts as concentrated.
    pub peak_concentration_ratio: f64,

    /// Smart charging: bonus when the site is overloaded.
    pub smart_overload_bonus: f64,
    /// Smart charging: window length that counts as flexible (h).
    pub smart_long_window_hours: f64,
    /// Smart charging: bonus for a flexible window.
    pub smart_long_window_bonus: f64,
    /// Smart charging: overload ratio below which load shifting suffices.
    pub smart_small_overload_ratio: f64,
    /// Smart charging: bonus for a small overload.
    pub smart_small_overload_bonus: f64,
    /// Smart charging: flat low-CAPEX bonus.
    pub smart_low_capex_bonus: f64,

    /// Storage: points per unit of overload ratio.
    pub storage_overload_weight: f64,
    /// Storage: cap on the overload contribution.
    pub storage_overload_cap: f64,
    /// Storage: robustness bonus.
    pub storage_robustness_bonus: f64,
    /// Storage: CAPEX penalty.
    pub storage_capex_penalty: f64,

    /// Grid upgrade: overload ratio treated as structurally severe.
    pub grid_severe_ratio: f64,
    /// Grid upgrade: overload ratio treated as moderate.
    pub grid_moderate_ratio: f64,
    pub grid_severe_score: f64,
    pub grid_moderate_score: f64,
    pub grid_low_score: f64,
    /// Grid upgrade: CAPEX and permitting penalty.
    pub grid_capex_penalty: f64,

    /// Charger derating: base score.
    pub charger_base_score: f64,
    /// Charger derating: bonus when derated chargers still deliver the daily energy.
    pub charger_feasible_bonus: f64,
    pub charger_low_capex_bonus: f64,
    /// Charger derating: derated power as a fraction of the current rating.
    pub charger_derate_factor: f64,
    /// Charger derating: lowest recommended power (kW).
    pub charger_min_kw: f64,

    /// Shifting the window to cheap/clean hours.
    pub shift_score: f64,
    /// Number of cheapest/cleanest hours reported.
    pub shift_top_hours: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            peak_concentration_ratio: 1.5,

            smart_overload_bonus: 40.0,
            smart_long_window_hours: 8.0,
            smart_long_window_bonus: 30.0,
            smart_small_overload_ratio: 0.3,
            smart_small_overload_bonus: 20.0,
            smart_low_capex_bonus: 10.0,

            storage_overload_weight: 100.0,
            storage_overload_cap: 40.0,
            storage_robustness_bonus: 30.0,
            storage_capex_penalty: 20.0,

            grid_severe_ratio: 0.5,
            grid_moderate_ratio: 0.3,
            grid_severe_score: 100.0,
            grid_moderate_score: 70.0,
            grid_low_score: 40.0,
            grid_capex_penalty: 40.0,

            charger_base_score: 30.0,
            charger_feasible_bonus: 25.0,
            charger_low_capex_bonus: 10.0,
            charger_derate_factor: 0.5,
            charger_min_kw: 50.0,

            shift_score: 85.0,
            shift_top_hours: 5,
        }
    }
}

impl Heuristics {
    /// Returns `(field, message)` for every value that would make the
    /// rules meaningless.
    pub fn problems(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        let weights = [
            ("smart_overload_bonus", self.smart_overload_bonus),
            ("smart_long_window_hours", self.smart_long_window_hours),
            ("smart_long_window_bonus", self.smart_long_window_bonus),
            ("smart_small_overload_ratio", self.smart_small_overload_ratio),
            ("smart_small_overload_bonus", self.smart_small_overload_bonus),
            ("smart_low_capex_bonus", self.smart_low_capex_bonus),
            ("storage_overload_weight", self.storage_overload_weight),
            ("storage_overload_cap", self.storage_overload_cap),
            ("storage_robustness_bonus", self.storage_robustness_bonus),
            ("storage_capex_penalty", self.storage_capex_penalty),
            ("grid_severe_ratio", self.grid_severe_ratio),
            ("grid_moderate_ratio", self.grid_moderate_ratio),
            ("grid_severe_score", self.grid_severe_score),
            ("grid_moderate_score", self.grid_moderate_score),
            ("grid_low_score", self.grid_low_score),
            ("grid_capex_penalty", self.grid_capex_penalty),
            ("charger_base_score", self.charger_base_score),
            ("charger_feasible_bonus", self.charger_feasible_bonus),
            ("charger_low_capex_bonus", self.charger_low_capex_bonus),
            ("charger_min_kw", self.charger_min_kw),
            ("shift_score", self.shift_score),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                out.push((field, "must be a finite number >= 0".to_string()));
            }
        }

        if !self.peak_concentration_ratio.is_finite() || self.peak_concentration_ratio <= 0.0 {
            out.push(("peak_concentration_ratio", "must be > 0".to_string()));
        }
        if !(self.charger_derate_factor > 0.0 && self.charger_derate_factor <= 1.0) {
            out.push(("charger_derate_factor", "must be in (0.0, 1.0]".to_string()));
        }
        if self.grid_moderate_ratio > self.grid_severe_ratio {
            out.push((
                "grid_moderate_ratio",
                "must be <= heuristics.grid_severe_ratio".to_string(),
            ));
        }
        if self.shift_top_hours == 0 || self.shift_top_hours > 24 {
            out.push(("shift_top_hours", "must be in 1..=24".to_string()));
        }

        out
    }
}
