//! Incremental site load from charging and the grid connection check.

use super::inputs::ModelInputs;
use super::result::LoadResult;

/// Grid connection of the depot.
///
/// A limit of zero (or below) means the connection is treated as
/// unconstrained; every load fits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteConnection {
    limit_kva: f64,
}

impl SiteConnection {
    /// Creates a connection with the given capacity limit.
    pub fn with_limit(limit_kva: f64) -> Self {
        Self {
            limit_kva: limit_kva.max(0.0),
        }
    }

    /// Returns the configured limit (0 when unconstrained).
    pub fn limit_kva(&self) -> f64 {
        self.limit_kva
    }

    pub fn is_constrained(&self) -> bool {
        self.limit_kva > 0.0
    }

    /// Returns `true` when `load_kw` fits the connection.
    ///
    /// kW and kVA are treated as interchangeable.
    pub fn within_limits(&self, load_kw: f64) -> bool {
        !self.is_constrained() || load_kw <= self.limit_kva
    }

    /// Load above the limit (kW); 0 when it fits or when unconstrained.
    pub fn overload_kw(&self, load_kw: f64) -> f64 {
        if self.is_constrained() {
            (load_kw - self.limit_kva).max(0.0)
        } else {
            0.0
        }
    }

    /// Overload as a fraction of the limit; 0 when unconstrained.
    pub fn overload_ratio(&self, load_kw: f64) -> f64 {
        if self.is_constrained() {
            self.overload_kw(load_kw) / self.limit_kva
        } else {
            0.0
        }
    }
}

/// Peak power a shaving battery must cover to hold the site at `desired_limit_kw`.
///
/// A non-positive desired limit disables sizing.
pub fn required_shaving_kw(peak_kw: f64, desired_limit_kw: f64) -> f64 {
    if desired_limit_kw > 0.0 {
        (peak_kw - desired_limit_kw).max(0.0)
    } else {
        0.0
    }
}

/// Computes worst-case and average site load for the fleet.
///
/// The theoretical peak assumes every charger runs at rated power at the
/// same time; the average spreads the daily energy over the declared
/// charging window.
pub fn compute(inputs: &ModelInputs, daily_energy_kwh: f64) -> LoadResult {
    let connection = SiteConnection::with_limit(inputs.site_capacity_limit_kva());

    let total_charge_power_kw = f64::from(inputs.fleet_size()) * inputs.charger_power_kw();
    let new_theoretical_peak_kw = inputs.existing_site_peak_kw() + total_charge_power_kw;
    let avg_charging_power_kw = daily_energy_kwh / inputs.window_hours();
    let new_avg_load_kw = inputs.existing_site_peak_kw() + avg_charging_power_kw;

    let required_shaving_kw =
        required_shaving_kw(new_theoretical_peak_kw, inputs.desired_peak_limit_kw());

    LoadResult {
        fleet_size: inputs.fleet_size(),
        charger_power_per_truck_kw: inputs.charger_power_kw(),
        existing_site_peak_kw: inputs.existing_site_peak_kw(),
        total_charge_power_kw,
        new_theoretical_peak_kw,
        avg_charging_power_kw,
        new_avg_load_kw,
        site_capacity_limit_kva: connection.limit_kva(),
        capacity_ok: connection.within_limits(new_theoretical_peak_kw),
        overload_kw: connection.overload_kw(new_theoretical_peak_kw),
        overload_ratio: connection.overload_ratio(new_theoretical_peak_kw),
        desired_peak_limit_kw: inputs.desired_peak_limit_kw(),
        required_shaving_kw,
        peak_duration_hours: inputs.peak_duration_hours(),
        required_battery_energy_kwh: required_shaving_kw * inputs.peak_duration_hours(),
    }
}
