//! Model inputs, clamped into their valid domain at construction.

use std::fmt;

use serde::Serialize;

use super::reference::HOURS_PER_DAY;

/// Unvalidated input values as collected from a scenario file or request.
///
/// Every field is accepted as-is; [`ModelInputs::new`] is responsible for
/// bringing each one into its domain.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInputs {
    /// Number of trucks charging on site.
    pub fleet_size: i64,
    /// Operating days per year.
    pub operating_days: i64,
    /// Charging events per truck per day.
    pub events_per_truck_per_day: f64,
    /// Usable battery capacity per truck (kWh).
    pub battery_kwh: f64,
    /// State of charge on arrival (0.0–1.0).
    pub start_soc: f64,
    /// State of charge on departure (0.0–1.0).
    pub target_soc: f64,
    /// EV energy consumption (kWh/km).
    pub ev_kwh_per_km: f64,
    /// Average electricity price (€/MWh).
    pub avg_price_eur_per_mwh: f64,
    /// Share of energy billed on the time-of-use tariff (0.0–1.0).
    pub dynamic_share: f64,
    /// First clock hour of the charging window.
    pub window_start_hour: i64,
    /// Clock hour at which the charging window closes (exclusive).
    pub window_end_hour: i64,
    /// Hours available to deliver the daily energy.
    pub window_hours: f64,
    /// Site peak before electrification (kW).
    pub existing_site_peak_kw: f64,
    /// Rated charger power per truck (kW).
    pub charger_power_kw: f64,
    /// Grid connection limit (kVA); 0 means unconstrained.
    pub site_capacity_limit_kva: f64,
    /// Diesel price (€/L).
    pub diesel_price_eur_per_litre: f64,
    /// Diesel consumption (L/100 km).
    pub diesel_l_per_100km: f64,
    /// Road toll rate (€/km).
    pub toll_rate_eur_per_km: f64,
    /// Share of distance driven on tolled roads (0.0–1.0).
    pub tolled_share: f64,
    /// Whether electric trucks are exempt from tolls.
    pub ev_toll_exempt: bool,
    /// Target site peak for battery peak shaving (kW); 0 disables sizing.
    pub desired_peak_limit_kw: f64,
    /// Duration the shaving battery must sustain its output (h).
    pub peak_duration_hours: f64,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            fleet_size: 10,
            operating_days: 250,
            events_per_truck_per_day: 1.0,
            battery_kwh: 500.0,
            start_soc: 0.2,
            target_soc: 1.0,
            ev_kwh_per_km: 1.6,
            avg_price_eur_per_mwh: 200.0,
            dynamic_share: 0.0,
            window_start_hour: 6,
            window_end_hour: 20,
            window_hours: 14.0,
            existing_site_peak_kw: 300.0,
            charger_power_kw: 150.0,
            site_capacity_limit_kva: 0.0,
            diesel_price_eur_per_litre: 1.8,
            diesel_l_per_100km: 28.0,
            toll_rate_eur_per_km: 0.2,
            tolled_share: 0.6,
            ev_toll_exempt: true,
            desired_peak_limit_kw: 0.0,
            peak_duration_hours: 2.0,
        }
    }
}

/// An adjustment made while bringing raw inputs into their domain.
///
/// Clamping never fails, but callers deserve to know when the model ran
/// on something other than what they asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputNotice {
    /// A value was outside its domain and was replaced.
    Clamped {
        field: &'static str,
        requested: f64,
        applied: f64,
    },
    /// Target SoC below start SoC; no energy is requested for the event.
    TargetSocBelowStart { start_soc: f64, target_soc: f64 },
}

impl fmt::Display for InputNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamped {
                field,
                requested,
                applied,
            } => write!(f, "{field}: {requested} adjusted to {applied}"),
            Self::TargetSocBelowStart {
                start_soc,
                target_soc,
            } => write!(
                f,
                "target SoC {target_soc:.2} is below start SoC {start_soc:.2}; \
                 no charging energy is requested"
            ),
        }
    }
}

/// Validated, immutable inputs for one evaluation.
///
/// Only constructible through [`ModelInputs::new`], which guarantees every
/// field lies in its domain (counts ≥ 1, fractions in `[0, 1]`, hours in
/// `0..24`, floors on consumption and window length).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInputs {
    fleet_size: u32,
    operating_days: u32,
    events_per_truck_per_day: f64,
    battery_kwh: f64,
    start_soc: f64,
    target_soc: f64,
    ev_kwh_per_km: f64,
    avg_price_eur_per_mwh: f64,
    dynamic_share: f64,
    window_start_hour: usize,
    window_end_hour: usize,
    window_hours: f64,
    existing_site_peak_kw: f64,
    charger_power_kw: f64,
    site_capacity_limit_kva: f64,
    diesel_price_eur_per_litre: f64,
    diesel_l_per_100km: f64,
    toll_rate_eur_per_km: f64,
    tolled_share: f64,
    ev_toll_exempt: bool,
    desired_peak_limit_kw: f64,
    peak_duration_hours: f64,
    notices: Vec<InputNotice>,
}

/// Minimum EV consumption accepted (kWh/km); keeps distance finite.
pub const MIN_EV_KWH_PER_KM: f64 = 0.01;
/// Minimum charging window length (h); keeps average power finite.
pub const MIN_WINDOW_HOURS: f64 = 0.1;

impl ModelInputs {
    /// Clamps raw values into their domain and records every adjustment.
    pub fn new(raw: &RawInputs) -> Self {
        let mut c = Clamper::default();

        let start_soc = c.within("start_soc", raw.start_soc, 0.0, 1.0);
        let target_soc = c.within("target_soc", raw.target_soc, 0.0, 1.0);
        if target_soc < start_soc {
            c.notices.push(InputNotice::TargetSocBelowStart {
                start_soc,
                target_soc,
            });
        }

        Self {
            fleet_size: c.count("fleet_size", raw.fleet_size),
            operating_days: c.count("operating_days", raw.operating_days),
            events_per_truck_per_day: c.at_least(
                "events_per_truck_per_day",
                raw.events_per_truck_per_day,
                0.0,
            ),
            battery_kwh: c.at_least("battery_kwh", raw.battery_kwh, 0.0),
            start_soc,
            target_soc,
            ev_kwh_per_km: c.at_least("ev_kwh_per_km", raw.ev_kwh_per_km, MIN_EV_KWH_PER_KM),
            avg_price_eur_per_mwh: c.finite("avg_price_eur_per_mwh", raw.avg_price_eur_per_mwh),
            dynamic_share: c.within("dynamic_share", raw.dynamic_share, 0.0, 1.0),
            window_start_hour: c.hour("window_start_hour", raw.window_start_hour),
            window_end_hour: c.hour("window_end_hour", raw.window_end_hour),
            window_hours: c.at_least("window_hours", raw.window_hours, MIN_WINDOW_HOURS),
            existing_site_peak_kw: c.at_least(
                "existing_site_peak_kw",
                raw.existing_site_peak_kw,
                0.0,
            ),
            charger_power_kw: c.at_least("charger_power_kw", raw.charger_power_kw, 0.0),
            site_capacity_limit_kva: c.at_least(
                "site_capacity_limit_kva",
                raw.site_capacity_limit_kva,
                0.0,
            ),
            diesel_price_eur_per_litre: c.at_least(
                "diesel_price_eur_per_litre",
                raw.diesel_price_eur_per_litre,
                0.0,
            ),
            diesel_l_per_100km: c.at_least("diesel_l_per_100km", raw.diesel_l_per_100km, 0.0),
            toll_rate_eur_per_km: c.at_least("toll_rate_eur_per_km", raw.toll_rate_eur_per_km, 0.0),
            tolled_share: c.within("tolled_share", raw.tolled_share, 0.0, 1.0),
            ev_toll_exempt: raw.ev_toll_exempt,
            desired_peak_limit_kw: c.at_least(
                "desired_peak_limit_kw",
                raw.desired_peak_limit_kw,
                0.0,
            ),
            peak_duration_hours: c.at_least("peak_duration_hours", raw.peak_duration_hours, 0.0),
            notices: c.notices,
        }
    }

    pub fn fleet_size(&self) -> u32 {
        self.fleet_size
    }

    pub fn operating_days(&self) -> u32 {
        self.operating_days
    }

    pub fn events_per_truck_per_day(&self) -> f64 {
        self.events_per_truck_per_day
    }

    pub fn battery_kwh(&self) -> f64 {
        self.battery_kwh
    }

    pub fn start_soc(&self) -> f64 {
        self.start_soc
    }

    pub fn target_soc(&self) -> f64 {
        self.target_soc
    }

    pub fn ev_kwh_per_km(&self) -> f64 {
        self.ev_kwh_per_km
    }

    pub fn avg_price_eur_per_mwh(&self) -> f64 {
        self.avg_price_eur_per_mwh
    }

    pub fn dynamic_share(&self) -> f64 {
        self.dynamic_share
    }

    pub fn window_start_hour(&self) -> usize {
        self.window_start_hour
    }

    pub fn window_end_hour(&self) -> usize {
        self.window_end_hour
    }

    pub fn window_hours(&self) -> f64 {
        self.window_hours
    }

    pub fn existing_site_peak_kw(&self) -> f64 {
        self.existing_site_peak_kw
    }

    pub fn charger_power_kw(&self) -> f64 {
        self.charger_power_kw
    }

    pub fn site_capacity_limit_kva(&self) -> f64 {
        self.site_capacity_limit_kva
    }

    pub fn diesel_price_eur_per_litre(&self) -> f64 {
        self.diesel_price_eur_per_litre
    }

    pub fn diesel_l_per_100km(&self) -> f64 {
        self.diesel_l_per_100km
    }

    pub fn toll_rate_eur_per_km(&self) -> f64 {
        self.toll_rate_eur_per_km
    }

    pub fn tolled_share(&self) -> f64 {
        self.tolled_share
    }

    pub fn ev_toll_exempt(&self) -> bool {
        self.ev_toll_exempt
    }

    pub fn desired_peak_limit_kw(&self) -> f64 {
        self.desired_peak_limit_kw
    }

    pub fn peak_duration_hours(&self) -> f64 {
        self.peak_duration_hours
    }

    /// Adjustments made during construction. SoC notices come first, the
    /// remaining clamps follow in field order.
    pub fn notices(&self) -> &[InputNotice] {
        &self.notices
    }
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self::new(&RawInputs::default())
    }
}

#[derive(Default)]
struct Clamper {
    notices: Vec<InputNotice>,
}

impl Clamper {
    fn record(&mut self, field: &'static str, requested: f64, applied: f64) -> f64 {
        // NaN never compares equal, so it is always reported.
        if requested != applied {
            self.notices.push(InputNotice::Clamped {
                field,
                requested,
                applied,
            });
        }
        applied
    }

    fn at_least(&mut self, field: &'static str, value: f64, min: f64) -> f64 {
        let applied = if value.is_nan() { min } else { value.max(min) };
        self.record(field, value, applied)
    }

    fn within(&mut self, field: &'static str, value: f64, lo: f64, hi: f64) -> f64 {
        let applied = if value.is_nan() { lo } else { value.clamp(lo, hi) };
        self.record(field, value, applied)
    }

    fn finite(&mut self, field: &'static str, value: f64) -> f64 {
        let applied = if value.is_finite() { value } else { 0.0 };
        self.record(field, value, applied)
    }

    fn count(&mut self, field: &'static str, value: i64) -> u32 {
        let applied = value.clamp(1, i64::from(u32::MAX));
        self.record(field, value as f64, applied as f64);
        applied as u32
    }

    fn hour(&mut self, field: &'static str, value: i64) -> usize {
        let applied = value.rem_euclid(HOURS_PER_DAY as i64);
        self.record(field, value as f64, applied as f64);
        applied as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_adjustment() {
        let inputs = ModelInputs::default();
        assert!(inputs.notices().is_empty(), "{:?}", inputs.notices());
        assert_eq!(inputs.fleet_size(), 10);
        assert_eq!(inputs.window_start_hour(), 6);
    }

    #[test]
    fn counts_clamp_to_one() {
        let raw = RawInputs {
            fleet_size: -3,
            operating_days: 0,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        assert_eq!(inputs.fleet_size(), 1);
        assert_eq!(inputs.operating_days(), 1);
        assert_eq!(inputs.notices().len(), 2);
    }

    #[test]
    fn fractions_clamp_to_unit_interval() {
        let raw = RawInputs {
            start_soc: -0.5,
            target_soc: 1.4,
            dynamic_share: 2.0,
            tolled_share: f64::NAN,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        assert_eq!(inputs.start_soc(), 0.0);
        assert_eq!(inputs.target_soc(), 1.0);
        assert_eq!(inputs.dynamic_share(), 1.0);
        assert_eq!(inputs.tolled_share(), 0.0);
    }

    #[test]
    fn hours_wrap_modulo_24() {
        let raw = RawInputs {
            window_start_hour: 26,
            window_end_hour: -1,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        assert_eq!(inputs.window_start_hour(), 2);
        assert_eq!(inputs.window_end_hour(), 23);
    }

    #[test]
    fn floors_apply_to_consumption_and_window() {
        let raw = RawInputs {
            ev_kwh_per_km: 0.0,
            window_hours: 0.0,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        assert_eq!(inputs.ev_kwh_per_km(), MIN_EV_KWH_PER_KM);
        assert_eq!(inputs.window_hours(), MIN_WINDOW_HOURS);
    }

    #[test]
    fn target_below_start_is_reported() {
        let raw = RawInputs {
            start_soc: 0.8,
            target_soc: 0.5,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        assert!(inputs.notices().iter().any(|n| matches!(
            n,
            InputNotice::TargetSocBelowStart { .. }
        )));
    }

    #[test]
    fn soc_notices_precede_other_clamps() {
        let raw = RawInputs {
            fleet_size: 0,
            start_soc: 0.8,
            target_soc: 0.5,
            ..RawInputs::default()
        };
        let inputs = ModelInputs::new(&raw);
        let notices = inputs.notices();
        assert_eq!(notices.len(), 2);
        assert!(matches!(notices[0], InputNotice::TargetSocBelowStart { .. }));
        assert!(matches!(
            notices[1],
            InputNotice::Clamped {
                field: "fleet_size",
                ..
            }
        ));
    }
}
