//! One-shot scenario evaluation: model, issues and ranked solutions.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::advisor::{Issue, Solution, detect_issues_with, rank_solutions_with};
use crate::config::ScenarioConfig;
use crate::model::{ModelResult, evaluate};

/// Everything the tool reports for one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub result: ModelResult,
    pub issues: Vec<Issue>,
    pub solutions: Vec<Solution>,
}

/// Evaluates a scenario with its own heuristics.
///
/// The scenario is not validated here; callers run
/// [`ScenarioConfig::validate`] first when the source is untrusted.
pub fn run_scenario(config: &ScenarioConfig) -> Evaluation {
    let inputs = config.to_inputs();
    let result = evaluate(&inputs);
    let issues = detect_issues_with(&result, &config.heuristics);
    let solutions = rank_solutions_with(&result, &issues, &config.heuristics);

    info!(
        issues = issues.len(),
        solutions = solutions.len(),
        total_savings_eur = result.diesel_vs_ev.total_savings_incl_toll_eur,
        "scenario evaluated"
    );

    Evaluation {
        result,
        issues,
        solutions,
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.result)?;

        writeln!(f, "\n--- Issues ---")?;
        if self.issues.is_empty() {
            writeln!(f, "No issues detected")?;
        }
        for issue in &self.issues {
            writeln!(f, "{issue}")?;
        }

        write!(f, "\n--- Solutions ---")?;
        if self.solutions.is_empty() {
            write!(f, "\nNo solutions applicable")?;
        }
        for (rank, s) in self.solutions.iter().enumerate() {
            write!(f, "\n{}. {s}", rank + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{IssueId, SolutionKind};

    #[test]
    fn scenario_heuristics_are_applied() {
        let mut cfg = ScenarioConfig::baseline();
        let strict = run_scenario(&cfg);
        assert!(strict.issues.iter().any(|i| i.id == IssueId::HighPeakConcentration));

        cfg.heuristics.peak_concentration_ratio = 10.0;
        let lenient = run_scenario(&cfg);
        assert!(lenient.issues.is_empty());
        assert!(lenient.solutions.is_empty());
    }

    #[test]
    fn marginal_case_recommends_shifting() {
        let eval = run_scenario(&ScenarioConfig::marginal_case());
        let kinds: Vec<_> = eval.solutions.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SolutionKind::ShiftCharging]);
    }

    #[test]
    fn display_has_all_sections() {
        let text = run_scenario(&ScenarioConfig::baseline()).to_string();
        assert!(text.contains("--- Fleet Model Report ---"));
        assert!(text.contains("--- Issues ---"));
        assert!(text.contains("--- Solutions ---"));
        assert!(text.contains("1. "));
    }
}
