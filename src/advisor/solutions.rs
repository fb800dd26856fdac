//! Mitigation options synthesized from detected issues and ranked by score.
//!
//! Every option is one row of a rule table: the issues it applies to, a
//! scoring function and a quantitative extractor. Ranking evaluates the
//! table uniformly, so adding an option is a new row rather than a new
//! code path.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::heuristics::Heuristics;
use super::issues::{Issue, IssueId};
use crate::model::ModelResult;
use crate::model::reference::{GRID_CO2_G_PER_KWH, TOU_PRICE_EUR_PER_KWH, lowest_hours};

/// Maximum number of solutions returned by a ranking.
pub const MAX_SOLUTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolutionKind {
    SmartCharging,
    BatteryStorage,
    ChargerDerating,
    GridUpgrade,
    ShiftCharging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapexLevel {
    None,
    Low,
    High,
    VeryHigh,
}

impl fmt::Display for CapexLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Low => "low",
            Self::High => "high",
            Self::VeryHigh => "very high",
        })
    }
}

/// One quantified effect of a solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Count(u32),
    Flag(bool),
    Hours(Vec<usize>),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v:.1}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Hours(hours) => {
                let parts: Vec<String> = hours.iter().map(|h| format!("{h:02}h")).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

pub type Quantities = BTreeMap<&'static str, MetricValue>;

/// A ranked mitigation option.
///
/// `rank_score` orders solutions within one ranking only; it carries no
/// meaning across evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub kind: SolutionKind,
    pub title: &'static str,
    pub definition: &'static str,
    pub how_to: &'static [&'static str],
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
    pub capex_level: CapexLevel,
    /// Fired issues this solution addresses.
    pub addresses: Vec<IssueId>,
    pub quantitative: Quantities,
    pub rank_score: f64,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (score {:.0}, CAPEX {})", self.title, self.rank_score, self.capex_level)?;
        writeln!(f, "  {}", self.definition)?;
        for step in self.how_to {
            writeln!(f, "  - {step}")?;
        }
        writeln!(f, "  Pros: {}", self.pros.join("; "))?;
        write!(f, "  Cons: {}", self.cons.join("; "))?;
        for (metric, value) in &self.quantitative {
            write!(f, "\n  {metric}: {value}")?;
        }
        Ok(())
    }
}

struct SolutionRule {
    kind: SolutionKind,
    title: &'static str,
    definition: &'static str,
    how_to: &'static [&'static str],
    pros: &'static [&'static str],
    cons: &'static [&'static str],
    capex_level: CapexLevel,
    applies_to: &'static [IssueId],
    score: fn(&ModelResult, &Heuristics) -> f64,
    quantify: fn(&ModelResult, &Heuristics) -> Quantities,
}

const LOAD_ISSUES: &[IssueId] = &[IssueId::CapacityExceeded, IssueId::HighPeakConcentration];

/// Definition order breaks score ties.
const RULES: [SolutionRule; 5] = [
    SolutionRule {
        kind: SolutionKind::SmartCharging,
        title: "Smart charging / load management",
        definition: "Software-controlled charging that staggers sessions and caps total site \
                     power to stay within grid capacity.",
        how_to: &[
            "Install OCPP-compatible smart chargers",
            "Configure a site-level power cap (kW)",
            "Apply staggered or priority-based charging rules",
        ],
        pros: &["Lowest CAPEX solution", "Fast to deploy", "No grid upgrade required"],
        cons: &["May increase charging time", "Requires a backend control system"],
        capex_level: CapexLevel::Low,
        applies_to: LOAD_ISSUES,
        score: smart_charging_score,
        quantify: smart_charging_quantities,
    },
    SolutionRule {
        kind: SolutionKind::BatteryStorage,
        title: "Battery energy storage (peak shaving)",
        definition: "A stationary battery supplies power during charging peaks, reducing grid draw.",
        how_to: &[
            "Install an on-site battery system",
            "Charge the battery during off-peak hours",
            "Discharge the battery during EV charging peaks",
        ],
        pros: &[
            "Physically reduces peak load",
            "Improves site resilience",
            "Future-proof for fleet expansion",
        ],
        cons: &["High CAPEX", "Round-trip efficiency losses"],
        capex_level: CapexLevel::High,
        applies_to: LOAD_ISSUES,
        score: storage_score,
        quantify: storage_quantities,
    },
    SolutionRule {
        kind: SolutionKind::ChargerDerating,
        title: "Reduce charger power rating",
        definition: "Lower the per-charger power to reduce simultaneous peak demand.",
        how_to: &[
            "Install lower-power chargers",
            "Or apply software power caps per charger",
        ],
        pros: &["Very low CAPEX", "Simple to implement"],
        cons: &["Longer charging times", "Less operational flexibility"],
        capex_level: CapexLevel::Low,
        applies_to: LOAD_ISSUES,
        score: derating_score,
        quantify: derating_quantities,
    },
    SolutionRule {
        kind: SolutionKind::GridUpgrade,
        title: "Grid connection / transformer upgrade",
        definition: "Permanent increase of grid or transformer capacity to carry the EV load.",
        how_to: &[
            "Apply for a connection upgrade with the utility",
            "Upgrade transformer and protection equipment",
            "Recommission the site connection",
        ],
        pros: &["Permanent solution", "No operational constraints"],
        cons: &["Very high CAPEX", "Long lead time", "Permitting required"],
        capex_level: CapexLevel::VeryHigh,
        applies_to: &[IssueId::CapacityExceeded],
        score: grid_upgrade_score,
        quantify: grid_upgrade_quantities,
    },
    SolutionRule {
        kind: SolutionKind::ShiftCharging,
        title: "Shift charging to cheaper / lower-CO2 hours",
        definition: "Move the charging window towards hours with lower prices and a cleaner grid mix.",
        how_to: &[
            "Increase the dynamic price share",
            "Move the charging window to night or midday",
            "Align the schedule with the TOU tariff structure",
        ],
        pros: &["No hardware investment", "Immediate OPEX improvement"],
        cons: &["Operational change required", "May reduce flexibility"],
        capex_level: CapexLevel::None,
        applies_to: &[IssueId::NegativeBusinessCase],
        score: shift_score,
        quantify: shift_quantities,
    },
];

/// Peak reduction the site needs (kW).
///
/// Against the connection limit when one is set, else against the desired
/// peak limit. With neither, the target is the average load rather than
/// zero, so an unconstrained site is not asked to shave its whole peak.
fn required_peak_reduction_kw(r: &ModelResult) -> f64 {
    let l = &r.load;
    if l.site_capacity_limit_kva > 0.0 {
        l.overload_kw
    } else if l.desired_peak_limit_kw > 0.0 {
        l.required_shaving_kw
    } else {
        (l.new_theoretical_peak_kw - l.new_avg_load_kw).max(0.0)
    }
}

fn smart_charging_score(r: &ModelResult, h: &Heuristics) -> f64 {
    let l = &r.load;
    let mut score = h.smart_low_capex_bonus;
    if l.overload_kw > 0.0 {
        score += h.smart_overload_bonus;
    }
    if r.charging_profile.charging_window_hours >= h.smart_long_window_hours {
        score += h.smart_long_window_bonus;
    }
    if l.overload_ratio < h.smart_small_overload_ratio {
        score += h.smart_small_overload_bonus;
    }
    score
}

fn smart_charging_quantities(r: &ModelResult, _: &Heuristics) -> Quantities {
    BTreeMap::from([
        ("peak_reduction_kw", MetricValue::Number(required_peak_reduction_kw(r))),
        ("overload_kw", MetricValue::Number(r.load.overload_kw)),
        (
            "charging_window_hours",
            MetricValue::Number(r.charging_profile.charging_window_hours),
        ),
    ])
}

/// Battery power and energy (kW, kWh) for peak shaving.
///
/// A desired peak limit fixes the sizing to the load model's figures, even
/// when the peak already sits below it.
fn storage_sizing(r: &ModelResult) -> (f64, f64) {
    let l = &r.load;
    if l.desired_peak_limit_kw > 0.0 {
        (l.required_shaving_kw, l.required_battery_energy_kwh)
    } else {
        let kw = required_peak_reduction_kw(r);
        (kw, kw * l.peak_duration_hours)
    }
}

fn storage_score(r: &ModelResult, h: &Heuristics) -> f64 {
    let overload = (r.load.overload_ratio * h.storage_overload_weight).min(h.storage_overload_cap);
    overload + h.storage_robustness_bonus - h.storage_capex_penalty
}

fn storage_quantities(r: &ModelResult, _: &Heuristics) -> Quantities {
    let (power_kw, energy_kwh) = storage_sizing(r);
    BTreeMap::from([
        ("required_power_kw", MetricValue::Number(power_kw)),
        ("required_battery_kwh", MetricValue::Number(energy_kwh)),
        (
            "peak_duration_hours",
            MetricValue::Number(r.load.peak_duration_hours),
        ),
    ])
}

fn derated_charger_kw(r: &ModelResult, h: &Heuristics) -> f64 {
    let current = r.load.charger_power_per_truck_kw;
    (current * h.charger_derate_factor).max(h.charger_min_kw).min(current)
}

/// Whether chargers at `kw` still deliver the daily energy inside the window.
fn delivers_daily_energy(r: &ModelResult, kw: f64) -> bool {
    kw * f64::from(r.load.fleet_size) * r.charging_profile.charging_window_hours
        >= r.energy_cost.daily_energy_kwh
}

fn derating_score(r: &ModelResult, h: &Heuristics) -> f64 {
    let recommended = derated_charger_kw(r, h);
    if recommended >= r.load.charger_power_per_truck_kw {
        return h.charger_base_score;
    }
    let mut score = h.charger_base_score + h.charger_low_capex_bonus;
    if delivers_daily_energy(r, recommended) {
        score += h.charger_feasible_bonus;
    }
    score
}

fn derating_quantities(r: &ModelResult, h: &Heuristics) -> Quantities {
    let current = r.load.charger_power_per_truck_kw;
    let recommended = derated_charger_kw(r, h);
    BTreeMap::from([
        ("current_charger_kw", MetricValue::Number(current)),
        ("recommended_charger_kw", MetricValue::Number(recommended)),
        (
            "peak_reduction_kw",
            MetricValue::Number((current - recommended) * f64::from(r.load.fleet_size)),
        ),
        (
            "delivers_daily_energy",
            MetricValue::Flag(delivers_daily_energy(r, recommended)),
        ),
    ])
}

fn grid_upgrade_score(r: &ModelResult, h: &Heuristics) -> f64 {
    let ratio = r.load.overload_ratio;
    let base = if ratio > h.grid_severe_ratio {
        h.grid_severe_score
    } else if ratio > h.grid_moderate_ratio {
        h.grid_moderate_score
    } else {
        h.grid_low_score
    };
    base - h.grid_capex_penalty
}

fn grid_upgrade_quantities(r: &ModelResult, _: &Heuristics) -> Quantities {
    BTreeMap::from([
        (
            "required_capacity_kva",
            MetricValue::Number(r.load.new_theoretical_peak_kw),
        ),
        ("overload_kw", MetricValue::Number(r.load.overload_kw)),
        ("overload_ratio", MetricValue::Number(r.load.overload_ratio)),
    ])
}

fn shift_score(_: &ModelResult, h: &Heuristics) -> f64 {
    h.shift_score
}

fn covered(flags: &[u8; 24], hours: &[usize]) -> u32 {
    hours.iter().filter(|&&h| flags.get(h) == Some(&1)).count() as u32
}

fn shift_quantities(r: &ModelResult, h: &Heuristics) -> Quantities {
    let flags = &r.charging_profile.flags;
    let cheapest = lowest_hours(&TOU_PRICE_EUR_PER_KWH, h.shift_top_hours);
    let cleanest = lowest_hours(&GRID_CO2_G_PER_KWH, h.shift_top_hours);
    BTreeMap::from([
        ("cheap_hours_covered", MetricValue::Count(covered(flags, &cheapest))),
        ("clean_hours_covered", MetricValue::Count(covered(flags, &cleanest))),
        ("cheapest_tou_hours", MetricValue::Hours(cheapest)),
        ("lowest_co2_hours", MetricValue::Hours(cleanest)),
        (
            "current_annual_savings_eur",
            MetricValue::Number(r.diesel_vs_ev.total_savings_incl_toll_eur),
        ),
        (
            "tou_relative_factor",
            MetricValue::Number(r.energy_cost.tou_relative_factor),
        ),
    ])
}

/// Ranks mitigation options using the default heuristics.
pub fn rank_solutions(result: &ModelResult, issues: &[Issue]) -> Vec<Solution> {
    rank_solutions_with(result, issues, &Heuristics::default())
}

/// Returns at most [`MAX_SOLUTIONS`] options, best first.
///
/// Only options applicable to at least one fired issue are considered;
/// with no issues there is nothing to recommend.
pub fn rank_solutions_with(
    result: &ModelResult,
    issues: &[Issue],
    heuristics: &Heuristics,
) -> Vec<Solution> {
    let fired: BTreeSet<IssueId> = issues.iter().map(|i| i.id).collect();
    if fired.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<Solution> = RULES
        .iter()
        .filter_map(|rule| {
            let addresses: Vec<IssueId> = rule
                .applies_to
                .iter()
                .copied()
                .filter(|id| fired.contains(id))
                .collect();
            if addresses.is_empty() {
                return None;
            }
            Some(Solution {
                kind: rule.kind,
                title: rule.title,
                definition: rule.definition,
                how_to: rule.how_to,
                pros: rule.pros,
                cons: rule.cons,
                capex_level: rule.capex_level,
                addresses,
                quantitative: (rule.quantify)(result, heuristics),
                rank_score: (rule.score)(result, heuristics),
            })
        })
        .collect();

    // Stable sort: equal scores keep definition order.
    candidates.sort_by(|a, b| b.rank_score.total_cmp(&a.rank_score));
    candidates.truncate(MAX_SOLUTIONS);

    for s in &candidates {
        debug!(solution = ?s.kind, score = s.rank_score, "solution ranked");
    }
    candidates
}
