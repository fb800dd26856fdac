//! Issue detection and solution ranking over a model result.

pub mod heuristics;
pub mod issues;
/// Ranked mitigation options.
pub mod solutions;

pub use heuristics::Heuristics;
pub use issues::{Issue, IssueId, Severity, detect_issues, detect_issues_with};
pub use solutions::{
    CapexLevel, MAX_SOLUTIONS, MetricValue, Solution, SolutionKind, rank_solutions,
    rank_solutions_with,
};
