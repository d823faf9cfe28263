//! Scenario and suite outcomes.

use serde::Serialize;
use std::time::Duration;

/// Result of running a single scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub name: String,
    /// Whether every step succeeded
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Steps that completed before the first failure
    pub steps_completed: usize,
    /// Steps in the scenario
    pub steps_total: usize,
    /// Wall time, session setup and cleanup included
    pub duration: Duration,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub fn pass(name: impl Into<String>, steps: usize) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            steps_completed: steps,
            steps_total: steps,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn fail(
        name: impl Into<String>,
        error: impl Into<String>,
        steps_completed: usize,
        steps_total: usize,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            steps_completed,
            steps_total,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results from running a scenario suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteOutcome {
    /// Suite name
    pub suite_name: String,
    /// Per-scenario outcomes, in run order
    pub results: Vec<ScenarioOutcome>,
    /// Scenarios skipped after a failure in fail-fast mode
    pub skipped: usize,
    /// Total duration
    pub duration: Duration,
}

impl SuiteOutcome {
    /// Check if all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get number of scenarios that ran
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(results: Vec<ScenarioOutcome>) -> SuiteOutcome {
        SuiteOutcome {
            suite_name: "checkout".to_string(),
            results,
            skipped: 0,
            duration: Duration::ZERO,
        }
    }

    #[test]
    fn test_pass_counts_every_step() {
        let outcome = ScenarioOutcome::pass("buy backpack", 5);
        assert!(outcome.passed);
        assert_eq!(outcome.steps_completed, outcome.steps_total);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_fail_keeps_progress() {
        let outcome = ScenarioOutcome::fail("buy ghost", "not found", 0, 4)
            .with_duration(Duration::from_millis(1200));
        assert!(!outcome.passed);
        assert_eq!(outcome.error.as_deref(), Some("not found"));
        assert_eq!(outcome.duration, Duration::from_millis(1200));
    }

    #[test]
    fn test_suite_counts() {
        let s = suite(vec![
            ScenarioOutcome::pass("a", 2),
            ScenarioOutcome::fail("b", "boom", 1, 2),
            ScenarioOutcome::pass("c", 3),
        ]);
        assert!(!s.all_passed());
        assert_eq!(s.passed_count(), 2);
        assert_eq!(s.failed_count(), 1);
        assert_eq!(s.total(), 3);
        assert_eq!(s.failures()[0].name, "b");
    }

    #[test]
    fn test_empty_suite_passes() {
        let s = suite(Vec::new());
        assert!(s.all_passed());
        assert_eq!(s.total(), 0);
    }
}
