//! Charging energy and electricity cost.

use super::inputs::ModelInputs;
use super::profile::HourlyProfile;
use super::reference::{TOU_PRICE_EUR_PER_KWH, curve_mean};
use super::result::EnergyCost;

/// Energy added per charging event as a fraction of capacity.
///
/// Never negative: a target below the start SoC requests nothing rather
/// than a discharge.
pub fn soc_diff(start_soc: f64, target_soc: f64) -> f64 {
    (target_soc.clamp(0.0, 1.0) - start_soc.clamp(0.0, 1.0)).max(0.0)
}

/// How favourable the window is relative to the all-day average TOU price.
///
/// Falls back to 1.0 when the curve average is zero.
pub fn tou_relative_factor(profile: &HourlyProfile, curve: &[f64; 24]) -> f64 {
    let avg = curve_mean(curve);
    if avg == 0.0 {
        return 1.0;
    }
    profile.weighted(curve) / avg
}

/// Blends a flat tariff with the window-weighted dynamic tariff.
///
/// `dynamic_share = 0` is pure flat billing; `1` re-weights the whole
/// flat price by `relative_factor`.
pub fn blended_price(flat_price: f64, dynamic_share: f64, relative_factor: f64) -> f64 {
    flat_price * (1.0 - dynamic_share) + flat_price * dynamic_share * relative_factor
}

/// Computes daily and annual energy and cost for the fleet.
pub fn compute(inputs: &ModelInputs, profile: &HourlyProfile) -> EnergyCost {
    let soc_diff = soc_diff(inputs.start_soc(), inputs.target_soc());
    let energy_per_event_kwh = inputs.battery_kwh() * soc_diff;
    let daily_energy_kwh =
        f64::from(inputs.fleet_size()) * inputs.events_per_truck_per_day() * energy_per_event_kwh;
    let annual_energy_kwh = daily_energy_kwh * f64::from(inputs.operating_days());

    let flat_price_eur_per_kwh = inputs.avg_price_eur_per_mwh() / 1000.0;
    let tou_relative_factor = tou_relative_factor(profile, &TOU_PRICE_EUR_PER_KWH);
    let effective_price_eur_per_kwh = blended_price(
        flat_price_eur_per_kwh,
        inputs.dynamic_share(),
        tou_relative_factor,
    );

    EnergyCost {
        soc_diff,
        energy_per_event_kwh,
        daily_energy_kwh,
        daily_energy_mwh: daily_energy_kwh / 1000.0,
        annual_energy_kwh,
        annual_energy_mwh: annual_energy_kwh / 1000.0,
        flat_price_eur_per_kwh,
        tou_window_avg_eur_per_kwh: profile.weighted(&TOU_PRICE_EUR_PER_KWH),
        tou_relative_factor,
        effective_price_eur_per_kwh,
        effective_price_eur_per_mwh: effective_price_eur_per_kwh * 1000.0,
        daily_cost_eur: daily_energy_kwh * effective_price_eur_per_kwh,
        annual_cost_eur: annual_energy_kwh * effective_price_eur_per_kwh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inputs::RawInputs;

    #[test]
    fn soc_diff_never_negative() {
        assert_eq!(soc_diff(0.9, 0.3), 0.0);
        assert!((soc_diff(0.2, 1.0) - 0.8).abs() < 1e-12);
        assert_eq!(soc_diff(-1.0, 2.0), 1.0);
    }

    #[test]
    fn flat_tariff_ignores_window() {
        assert_eq!(blended_price(0.2, 0.0, 1.7), 0.2);
    }

    #[test]
    fn fully_dynamic_tariff_uses_factor() {
        assert!((blended_price(0.2, 1.0, 0.9) - 0.18).abs() < 1e-12);
    }

    #[test]
    fn full_day_window_has_unit_factor() {
        let p = HourlyProfile::from_window(0, 0);
        assert!((tou_relative_factor(&p, &TOU_PRICE_EUR_PER_KWH) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_curve_falls_back_to_unit_factor() {
        let p = HourlyProfile::from_window(6, 20);
        assert_eq!(tou_relative_factor(&p, &[0.0; 24]), 1.0);
    }

    #[test]
    fn night_window_is_cheaper_than_evening() {
        let night = HourlyProfile::from_window(0, 6);
        let evening = HourlyProfile::from_window(17, 22);
        assert!(
            tou_relative_factor(&night, &TOU_PRICE_EUR_PER_KWH)
                < tou_relative_factor(&evening, &TOU_PRICE_EUR_PER_KWH)
        );
    }

    #[test]
    fn fleet_energy_and_cost() {
        let inputs = ModelInputs::new(&RawInputs {
            fleet_size: 10,
            battery_kwh: 500.0,
            start_soc: 0.2,
            target_soc: 1.0,
            events_per_truck_per_day: 1.0,
            operating_days: 250,
            avg_price_eur_per_mwh: 200.0,
            dynamic_share: 0.0,
            ..RawInputs::default()
        });
        let p = HourlyProfile::from_window(6, 20);
        let e = compute(&inputs, &p);
        assert!((e.energy_per_event_kwh - 400.0).abs() < 1e-9);
        assert!((e.daily_energy_kwh - 4000.0).abs() < 1e-9);
        assert!((e.daily_energy_mwh - 4.0).abs() < 1e-12);
        assert!((e.annual_energy_kwh - 1_000_000.0).abs() < 1e-6);
        assert!((e.annual_cost_eur - 200_000.0).abs() < 1e-6);
        assert!((e.daily_cost_eur - 800.0).abs() < 1e-9);
    }
}
