//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::advisor::Heuristics;
use crate::model::{ModelInputs, RawInputs};

/// Top-level scenario configuration parsed from TOML (or JSON over the API).
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub fleet: FleetConfig,
    /// Truck battery and charging-event state of charge.
    #[serde(default)]
    pub battery: BatteryConfig,
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Charging window and charger rating.
    #[serde(default)]
    pub charging: ChargingConfig,
    /// Depot load and grid connection.
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub diesel: DieselConfig,
    #[serde(default)]
    pub toll: TollConfig,
    /// Issue thresholds and solution score weights.
    #[serde(default)]
    pub heuristics: Heuristics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FleetConfig {
    /// Number of trucks (clamped to >= 1).
    pub size: i64,
    /// Operating days per year (clamped to >= 1).
    pub operating_days: i64,
    pub events_per_truck_per_day: f64,
    /// EV consumption (kWh/km).
    pub ev_kwh_per_km: f64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            size: 10,
            operating_days: 250,
            events_per_truck_per_day: 1.0,
            ev_kwh_per_km: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    pub capacity_kwh: f64,
    /// SoC on arrival (0.0–1.0).
    pub start_soc: f64,
    /// SoC on departure (0.0–1.0).
    pub target_soc: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 500.0,
            start_soc: 0.2,
            target_soc: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Flat electricity price (€/MWh).
    pub avg_price_eur_per_mwh: f64,
    /// Share billed on the time-of-use curve (0.0–1.0).
    pub dynamic_share: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            avg_price_eur_per_mwh: 200.0,
            dynamic_share: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChargingConfig {
    /// First clock hour of the window (wraps modulo 24).
    pub window_start_hour: i64,
    /// Clock hour the window closes, exclusive (wraps modulo 24).
    pub window_end_hour: i64,
    /// Hours available to deliver the daily energy.
    pub window_hours: f64,
    /// Rated charger power per truck (kW).
    pub charger_power_kw: f64,
}

impl Default for ChargingConfig {
    fn default() -> Self {
        Self {
            window_start_hour: 6,
            window_end_hour: 20,
            window_hours: 14.0,
            charger_power_kw: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub existing_peak_kw: f64,
    /// Grid connection limit (kVA); 0 means unconstrained.
    pub capacity_limit_kva: f64,
    /// Peak-shaving target (kW); 0 disables battery sizing.
    pub desired_peak_limit_kw: f64,
    pub peak_duration_hours: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            existing_peak_kw: 300.0,
            capacity_limit_kva: 0.0,
            desired_peak_limit_kw: 0.0,
            peak_duration_hours: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DieselConfig {
    pub price_eur_per_litre: f64,
    pub l_per_100km: f64,
}

impl Default for DieselConfig {
    fn default() -> Self {
        Self {
            price_eur_per_litre: 1.8,
            l_per_100km: 28.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TollConfig {
    pub rate_eur_per_km: f64,
    /// Share of distance on tolled roads (0.0–1.0).
    pub tolled_share: f64,
    pub ev_exempt: bool,
}

impl Default for TollConfig {
    fn default() -> Self {
        Self {
            rate_eur_per_km: 0.2,
            tolled_share: 0.6,
            ev_exempt: true,
        }
    }
}

#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ScenarioConfig {
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Grid connection well below the simultaneous charging peak.
    pub fn constrained_site() -> Self {
        Self {
            site: SiteConfig {
                capacity_limit_kva: 1200.0,
                desired_peak_limit_kw: 1200.0,
                ..SiteConfig::default()
            },
            ..Self::default()
        }
    }

    /// Overnight charging on a mostly dynamic tariff.
    pub fn night_shift() -> Self {
        Self {
            tariff: TariffConfig {
                dynamic_share: 0.7,
                ..TariffConfig::default()
            },
            charging: ChargingConfig {
                window_start_hour: 22,
                window_end_hour: 6,
                window_hours: 8.0,
                ..ChargingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Cheap diesel, expensive power and no toll advantage.
    pub fn marginal_case() -> Self {
        Self {
            tariff: TariffConfig {
                avg_price_eur_per_mwh: 320.0,
                ..TariffConfig::default()
            },
            charging: ChargingConfig {
                charger_power_kw: 40.0,
                ..ChargingConfig::default()
            },
            diesel: DieselConfig {
                price_eur_per_litre: 1.1,
                l_per_100km: 24.0,
            },
            toll: TollConfig {
                rate_eur_per_km: 0.0,
                ..TollConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "constrained_site", "night_shift", "marginal_case"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "constrained_site" => Ok(Self::constrained_site()),
            "night_shift" => Ok(Self::night_shift()),
            "marginal_case" => Ok(Self::marginal_case()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Out-of-range values are not errors here; the model clamps them and
    /// reports a notice. Only values clamping cannot repair are rejected.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let numbers = [
            ("fleet.events_per_truck_per_day", self.fleet.events_per_truck_per_day),
            ("fleet.ev_kwh_per_km", self.fleet.ev_kwh_per_km),
            ("battery.capacity_kwh", self.battery.capacity_kwh),
            ("battery.start_soc", self.battery.start_soc),
            ("battery.target_soc", self.battery.target_soc),
            ("tariff.avg_price_eur_per_mwh", self.tariff.avg_price_eur_per_mwh),
            ("tariff.dynamic_share", self.tariff.dynamic_share),
            ("charging.window_hours", self.charging.window_hours),
            ("charging.charger_power_kw", self.charging.charger_power_kw),
            ("site.existing_peak_kw", self.site.existing_peak_kw),
            ("site.capacity_limit_kva", self.site.capacity_limit_kva),
            ("site.desired_peak_limit_kw", self.site.desired_peak_limit_kw),
            ("site.peak_duration_hours", self.site.peak_duration_hours),
            ("diesel.price_eur_per_litre", self.diesel.price_eur_per_litre),
            ("diesel.l_per_100km", self.diesel.l_per_100km),
            ("toll.rate_eur_per_km", self.toll.rate_eur_per_km),
            ("toll.tolled_share", self.toll.tolled_share),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                errors.push(ConfigError {
                    field: field.into(),
                    message: format!("must be a finite number, got {value}"),
                });
            }
        }

        for (field, message) in self.heuristics.problems() {
            errors.push(ConfigError {
                field: format!("heuristics.{field}"),
                message,
            });
        }

        errors
    }

    /// Flattens the sections into raw model inputs.
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            fleet_size: self.fleet.size,
            operating_days: self.fleet.operating_days,
            events_per_truck_per_day: self.fleet.events_per_truck_per_day,
            battery_kwh: self.battery.capacity_kwh,
            start_soc: self.battery.start_soc,
            target_soc: self.battery.target_soc,
            ev_kwh_per_km: self.fleet.ev_kwh_per_km,
            avg_price_eur_per_mwh: self.tariff.avg_price_eur_per_mwh,
            dynamic_share: self.tariff.dynamic_share,
            window_start_hour: self.charging.window_start_hour,
            window_end_hour: self.charging.window_end_hour,
            window_hours: self.charging.window_hours,
            existing_site_peak_kw: self.site.existing_peak_kw,
            charger_power_kw: self.charging.charger_power_kw,
            site_capacity_limit_kva: self.site.capacity_limit_kva,
            diesel_price_eur_per_litre: self.diesel.price_eur_per_litre,
            diesel_l_per_100km: self.diesel.l_per_100km,
            toll_rate_eur_per_km: self.toll.rate_eur_per_km,
            tolled_share: self.toll.tolled_share,
            ev_toll_exempt: self.toll.ev_exempt,
            desired_peak_limit_kw: self.site.desired_peak_limit_kw,
            peak_duration_hours: self.site.peak_duration_hours,
        }
    }

    /// Builds clamped model inputs from this scenario.
    pub fn to_inputs(&self) -> ModelInputs {
        ModelInputs::new(&self.raw_inputs())
    }
}
