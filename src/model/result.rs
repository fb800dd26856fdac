//! Typed result tree produced by one evaluation.

use std::fmt;

use serde::Serialize;

use super::inputs::InputNotice;
use super::reference::HOURS_PER_DAY;

/// Everything derived from one set of [`ModelInputs`](super::inputs::ModelInputs).
///
/// Grouped by concern; recomputing from identical inputs yields an
/// identical value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelResult {
    pub charging_profile: ChargingProfile,
    pub energy_cost: EnergyCost,
    pub co2: Emissions,
    pub distance: Distance,
    pub diesel_vs_ev: DieselVsEv,
    pub load: LoadResult,
    /// Input adjustments made before the model ran.
    pub notices: Vec<InputNotice>,
}

/// Charging window as seen by the hourly curves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingProfile {
    pub start_hour: usize,
    pub end_hour: usize,
    /// Clock hours flagged by the window.
    pub charging_hours_by_clock: u32,
    /// Declared hours available to deliver the daily energy.
    pub charging_window_hours: f64,
    pub flags: [u8; HOURS_PER_DAY],
    pub shares: [f64; HOURS_PER_DAY],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyCost {
    pub soc_diff: f64,
    pub energy_per_event_kwh: f64,
    pub daily_energy_kwh: f64,
    pub daily_energy_mwh: f64,
    pub annual_energy_kwh: f64,
    pub annual_energy_mwh: f64,
    pub flat_price_eur_per_kwh: f64,
    /// Share-weighted time-of-use price inside the window.
    pub tou_window_avg_eur_per_kwh: f64,
    /// Window average divided by the all-day average (1.0 when undefined).
    pub tou_relative_factor: f64,
    pub effective_price_eur_per_kwh: f64,
    pub effective_price_eur_per_mwh: f64,
    pub daily_cost_eur: f64,
    pub annual_cost_eur: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emissions {
    pub effective_co2_kg_per_kwh: f64,
    pub annual_ev_co2_kg: f64,
    pub annual_ev_co2_tonnes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distance {
    pub km_per_truck_per_day: f64,
    pub annual_km_per_truck: f64,
    pub annual_km_fleet: f64,
}

/// Diesel baseline against the electric fleet. Positive savings favour EV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DieselVsEv {
    pub diesel_litres: f64,
    pub diesel_cost_eur: f64,
    pub diesel_co2_kg: f64,
    pub ev_cost_eur: f64,
    pub ev_co2_kg: f64,
    pub baseline_toll_eur: f64,
    pub ev_toll_eur: f64,
    pub cost_savings_eur: f64,
    pub co2_savings_kg: f64,
    pub toll_savings_eur: f64,
    pub total_savings_incl_toll_eur: f64,
    pub diesel_cost_per_km_eur: f64,
    pub ev_cost_per_km_eur: f64,
    pub diesel_co2_per_km_kg: f64,
    pub ev_co2_per_km_kg: f64,
    pub diesel_cost_per_truck_eur: f64,
    pub ev_cost_per_truck_eur: f64,
    pub diesel_co2_per_truck_kg: f64,
    pub ev_co2_per_truck_kg: f64,
}

/// Incremental site load and the capacity check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult {
    pub fleet_size: u32,
    pub charger_power_per_truck_kw: f64,
    pub existing_site_peak_kw: f64,
    pub total_charge_power_kw: f64,
    pub new_theoretical_peak_kw: f64,
    pub avg_charging_power_kw: f64,
    pub new_avg_load_kw: f64,
    /// 0 means unconstrained.
    pub site_capacity_limit_kva: f64,
    pub capacity_ok: bool,
    /// Peak above the capacity limit (kW); 0 when unconstrained.
    pub overload_kw: f64,
    /// Overload relative to the limit; 0 when unconstrained.
    pub overload_ratio: f64,
    pub desired_peak_limit_kw: f64,
    pub required_shaving_kw: f64,
    pub peak_duration_hours: f64,
    pub required_battery_energy_kwh: f64,
}

impl fmt::Display for ModelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.charging_profile;
        let e = &self.energy_cost;
        let c = &self.co2;
        let d = &self.distance;
        let dv = &self.diesel_vs_ev;
        let l = &self.load;

        writeln!(f, "--- Fleet Model Report ---")?;
        writeln!(
            f,
            "Charging window:       {:02}:00 -> {:02}:00 ({} clock hours, {:.1} h declared)",
            p.start_hour, p.end_hour, p.charging_hours_by_clock, p.charging_window_hours
        )?;
        writeln!(f, "SoC difference:        {:.3}", e.soc_diff)?;
        writeln!(f, "Energy per event:      {:.1} kWh", e.energy_per_event_kwh)?;
        writeln!(f, "Daily energy:          {:.1} kWh", e.daily_energy_kwh)?;
        writeln!(f, "Annual energy:         {:.1} MWh", e.annual_energy_mwh)?;
        writeln!(
            f,
            "Effective price:       {:.4} EUR/kWh (TOU factor {:.3})",
            e.effective_price_eur_per_kwh, e.tou_relative_factor
        )?;
        writeln!(f, "Annual energy cost:    {:.0} EUR", e.annual_cost_eur)?;
        writeln!(
            f,
            "Effective grid CO2:    {:.3} kg/kWh",
            c.effective_co2_kg_per_kwh
        )?;
        writeln!(f, "Annual EV CO2:         {:.1} t", c.annual_ev_co2_tonnes)?;
        writeln!(
            f,
            "Distance:              {:.1} km/truck/day, {:.0} km/year fleet",
            d.km_per_truck_per_day, d.annual_km_fleet
        )?;
        writeln!(f, "Diesel cost:           {:.0} EUR", dv.diesel_cost_eur)?;
        writeln!(f, "Diesel CO2:            {:.1} t", dv.diesel_co2_kg / 1000.0)?;
        writeln!(
            f,
            "Toll (diesel / EV):    {:.0} / {:.0} EUR",
            dv.baseline_toll_eur, dv.ev_toll_eur
        )?;
        writeln!(
            f,
            "Cost per km:           diesel {:.3} / EV {:.3} EUR",
            dv.diesel_cost_per_km_eur, dv.ev_cost_per_km_eur
        )?;
        writeln!(
            f,
            "Total savings:         {:.0} EUR/year",
            dv.total_savings_incl_toll_eur
        )?;
        writeln!(f, "CO2 savings:           {:.1} t/year", dv.co2_savings_kg / 1000.0)?;
        writeln!(f, "New theoretical peak:  {:.1} kW", l.new_theoretical_peak_kw)?;
        writeln!(f, "New average load:      {:.1} kW", l.new_avg_load_kw)?;
        if l.site_capacity_limit_kva > 0.0 {
            writeln!(
                f,
                "Site capacity:         {:.0} kVA ({})",
                l.site_capacity_limit_kva,
                if l.capacity_ok { "ok" } else { "exceeded" }
            )?;
        } else {
            writeln!(f, "Site capacity:         unconstrained")?;
        }
        write!(
            f,
            "Peak shaving:          {:.1} kW / {:.1} kWh",
            l.required_shaving_kw, l.required_battery_energy_kwh
        )
    }
}
