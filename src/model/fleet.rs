//! Fleet model orchestrator: one consistent result set per input set.

use tracing::debug;

use super::inputs::ModelInputs;
use super::profile::HourlyProfile;
use super::result::{ChargingProfile, ModelResult};
use super::{diesel, emissions, energy, load};

/// Evaluates the full model for one set of inputs.
///
/// Pure and synchronous: no shared state is read or written, so
/// concurrent callers each evaluate their own inputs independently.
///
/// # Examples
///
/// ```
/// use ev_fleet_model::model::fleet::evaluate;
/// use ev_fleet_model::model::inputs::ModelInputs;
///
/// let result = evaluate(&ModelInputs::default());
/// assert_eq!(result.charging_profile.charging_hours_by_clock, 14);
/// ```
pub fn evaluate(inputs: &ModelInputs) -> ModelResult {
    let profile = HourlyProfile::from_window(inputs.window_start_hour(), inputs.window_end_hour());

    let energy_cost = energy::compute(inputs, &profile);
    let co2 = emissions::compute(energy_cost.annual_energy_kwh, &profile);
    let distance = diesel::distance(inputs, energy_cost.daily_energy_kwh);
    let diesel_vs_ev = diesel::compare(inputs, &distance, &energy_cost, &co2);
    let load = load::compute(inputs, energy_cost.daily_energy_kwh);

    debug!(
        fleet_size = inputs.fleet_size(),
        daily_energy_kwh = energy_cost.daily_energy_kwh,
        effective_price_eur_per_kwh = energy_cost.effective_price_eur_per_kwh,
        peak_kw = load.new_theoretical_peak_kw,
        capacity_ok = load.capacity_ok,
        total_savings_eur = diesel_vs_ev.total_savings_incl_toll_eur,
        "fleet model evaluated"
    );

    ModelResult {
        charging_profile: ChargingProfile {
            start_hour: inputs.window_start_hour(),
            end_hour: inputs.window_end_hour(),
            charging_hours_by_clock: profile.flagged_hours(),
            charging_window_hours: inputs.window_hours(),
            flags: *profile.flags(),
            shares: *profile.shares(),
        },
        energy_cost,
        co2,
        distance,
        diesel_vs_ev,
        load,
        notices: inputs.notices().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inputs::RawInputs;

    #[test]
    fn identical_inputs_give_identical_results() {
        let inputs = ModelInputs::default();
        assert_eq!(evaluate(&inputs), evaluate(&inputs));
    }

    #[test]
    fn notices_are_carried_into_result() {
        let inputs = ModelInputs::new(&RawInputs {
            start_soc: 0.9,
            target_soc: 0.4,
            ..RawInputs::default()
        });
        let r = evaluate(&inputs);
        assert_eq!(r.energy_cost.daily_energy_kwh, 0.0);
        assert_eq!(r.notices.len(), 1);
    }

    #[test]
    fn display_does_not_panic() {
        let s = format!("{}", evaluate(&ModelInputs::default()));
        assert!(s.contains("Fleet Model Report"));
    }
}
