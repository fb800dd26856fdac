//! Structural issue detection over a model result.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::heuristics::Heuristics;
use crate::model::ModelResult;

/// Identifier of a detectable issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueId {
    CapacityExceeded,
    HighPeakConcentration,
    NegativeBusinessCase,
}

impl IssueId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CapacityExceeded => "capacity_exceeded",
            Self::HighPeakConcentration => "high_peak_concentration",
            Self::NegativeBusinessCase => "negative_business_case",
        }
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub id: IssueId,
    pub severity: Severity,
    pub description: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.id, self.description)
    }
}

struct IssueRule {
    id: IssueId,
    severity: Severity,
    description: &'static str,
    fires: fn(&ModelResult, &Heuristics) -> bool,
}

/// Evaluated in order; every rule is independent of the others.
const RULES: [IssueRule; 3] = [
    IssueRule {
        id: IssueId::CapacityExceeded,
        severity: Severity::High,
        description: "Site connection / grid capacity is exceeded by EV charging load.",
        fires: capacity_exceeded,
    },
    IssueRule {
        id: IssueId::HighPeakConcentration,
        severity: Severity::Medium,
        description: "Charging demand is highly concentrated, creating peak stress.",
        fires: high_peak_concentration,
    },
    IssueRule {
        id: IssueId::NegativeBusinessCase,
        severity: Severity::Medium,
        description: "EV operating costs are not lower than diesel under current assumptions.",
        fires: negative_business_case,
    },
];

fn capacity_exceeded(r: &ModelResult, _: &Heuristics) -> bool {
    !r.load.capacity_ok
}

fn high_peak_concentration(r: &ModelResult, h: &Heuristics) -> bool {
    r.load.new_theoretical_peak_kw > h.peak_concentration_ratio * r.load.new_avg_load_kw
}

fn negative_business_case(r: &ModelResult, _: &Heuristics) -> bool {
    r.diesel_vs_ev.total_savings_incl_toll_eur <= 0.0
}

/// Flags structural problems using the default heuristics.
pub fn detect_issues(result: &ModelResult) -> Vec<Issue> {
    detect_issues_with(result, &Heuristics::default())
}

/// Flags structural problems; output order follows rule order.
pub fn detect_issues_with(result: &ModelResult, heuristics: &Heuristics) -> Vec<Issue> {
    RULES
        .iter()
        .filter(|rule| (rule.fires)(result, heuristics))
        .map(|rule| {
            debug!(issue = rule.id.as_str(), severity = %rule.severity, "issue detected");
            Issue {
                id: rule.id,
                severity: rule.severity,
                description: rule.description.to_string(),
            }
        })
        .collect()
}
