//! Published reference data shared by every evaluation.
//!
//! These values are part of the public data contract: results are only
//! comparable across tools when the curves are reproduced exactly.

/// Number of clock hours in the daily profile.
pub const HOURS_PER_DAY: usize = 24;

/// Tank-to-wheel CO₂ emitted per litre of diesel burned (kg/L).
pub const DIESEL_CO2_KG_PER_LITRE: f64 = 2.64;

/// Hourly grid carbon intensity (g CO₂/kWh), index = clock hour.
pub const GRID_CO2_G_PER_KWH: [f64; HOURS_PER_DAY] = [
    80.0, 78.0, 75.0, 70.0, 65.0, 60.0, 60.0, 65.0, 70.0, 75.0, 60.0, 50.0, //
    45.0, 45.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 90.0, 83.0, 78.0, 76.0,
];

/// Hourly time-of-use electricity price (€/kWh), index = clock hour.
pub const TOU_PRICE_EUR_PER_KWH: [f64; HOURS_PER_DAY] = [
    0.20, 0.195, 0.19, 0.185, 0.18, 0.18, 0.185, 0.19, //
    0.21, 0.24, 0.23, 0.22, 0.20, 0.20, 0.205, 0.21, //
    0.23, 0.26, 0.30, 0.33, 0.31, 0.28, 0.24, 0.22,
];

/// Returns the indices of the `n` lowest values of a 24-hour curve.
///
/// Ties keep clock order (the earlier hour wins), so the result is
/// deterministic for the published curves.
pub fn lowest_hours(curve: &[f64; HOURS_PER_DAY], n: usize) -> Vec<usize> {
    let mut hours: Vec<usize> = (0..HOURS_PER_DAY).collect();
    hours.sort_by(|&a, &b| curve[a].total_cmp(&curve[b]));
    hours.truncate(n.min(HOURS_PER_DAY));
    hours
}

/// Arithmetic mean of a 24-hour curve.
pub fn curve_mean(curve: &[f64; HOURS_PER_DAY]) -> f64 {
    curve.iter().sum::<f64>() / HOURS_PER_DAY as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheapest_tou_hours_are_early_morning() {
        assert_eq!(lowest_hours(&TOU_PRICE_EUR_PER_KWH, 5), vec![4, 5, 3, 6, 2]);
    }

    #[test]
    fn cleanest_hours_are_midday() {
        assert_eq!(lowest_hours(&GRID_CO2_G_PER_KWH, 5), vec![12, 13, 11, 14, 5]);
    }

    #[test]
    fn lowest_hours_caps_at_curve_length() {
        assert_eq!(lowest_hours(&GRID_CO2_G_PER_KWH, 40).len(), HOURS_PER_DAY);
    }

    #[test]
    fn tou_mean_matches_hand_sum() {
        let expected = TOU_PRICE_EUR_PER_KWH.iter().sum::<f64>() / 24.0;
        assert!((curve_mean(&TOU_PRICE_EUR_PER_KWH) - expected).abs() < 1e-12);
        assert!(curve_mean(&TOU_PRICE_EUR_PER_KWH) > 0.0);
    }
}
