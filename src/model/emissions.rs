//! EV emissions from the hourly grid carbon curve.

use super::profile::HourlyProfile;
use super::reference::GRID_CO2_G_PER_KWH;
use super::result::Emissions;

/// Share-weighted grid intensity over the charging window (kg CO₂/kWh).
pub fn effective_co2_kg_per_kwh(profile: &HourlyProfile) -> f64 {
    profile.weighted(&GRID_CO2_G_PER_KWH) / 1000.0
}

pub fn compute(annual_energy_kwh: f64, profile: &HourlyProfile) -> Emissions {
    let effective_co2_kg_per_kwh = effective_co2_kg_per_kwh(profile);
    let annual_ev_co2_kg = annual_energy_kwh * effective_co2_kg_per_kwh;
    Emissions {
        effective_co2_kg_per_kwh,
        annual_ev_co2_kg,
        annual_ev_co2_tonnes: annual_ev_co2_kg / 1000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hour_window_uses_that_hour() {
        // Hour 12 carries 45 g/kWh.
        let p = HourlyProfile::from_window(12, 13);
        assert!((effective_co2_kg_per_kwh(&p) - 0.045).abs() < 1e-12);
    }

    #[test]
    fn annual_co2_scales_with_energy() {
        let p = HourlyProfile::from_window(6, 20);
        let a = compute(1000.0, &p);
        let b = compute(2000.0, &p);
        assert!((b.annual_ev_co2_kg - 2.0 * a.annual_ev_co2_kg).abs() < 1e-9);
        assert!((a.annual_ev_co2_tonnes * 1000.0 - a.annual_ev_co2_kg).abs() < 1e-9);
    }
}
