//! Terminal reporting of scenario results

use console::{style, Term};
use std::time::Duration;
use storeprobe::{ScenarioOutcome, SuiteOutcome};

/// Writes scenario results to stdout
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a plain line
    pub fn line(&self, message: &str) {
        if !self.quiet {
            let _ = self.term.write_line(message);
        }
    }

    /// Report one scenario
    pub fn scenario(&self, outcome: &ScenarioOutcome) {
        let line = format_scenario(outcome);
        if outcome.passed {
            self.success(&line);
        } else {
            self.failure(&line);
        }
    }

    /// Report every scenario and the totals
    pub fn suite(&self, outcome: &SuiteOutcome) {
        for result in &outcome.results {
            self.scenario(result);
        }
        if outcome.skipped > 0 {
            self.warning(&format!("{} scenario(s) skipped (fail-fast)", outcome.skipped));
        }
        let summary = format_summary(outcome);
        if outcome.all_passed() {
            self.line(&summary);
        } else {
            // Always print the summary of a failing run
            let _ = self.term.write_line(&summary);
        }
    }
}

/// One result line: name, progress, time, and the error if any
#[must_use]
pub fn format_scenario(outcome: &ScenarioOutcome) -> String {
    let mut line = format!(
        "{} ({}/{} steps, {})",
        outcome.name,
        outcome.steps_completed,
        outcome.steps_total,
        format_duration(outcome.duration)
    );
    if let Some(ref error) = outcome.error {
        line.push_str(&format!("\n    {error}"));
    }
    line
}

/// Totals line
#[must_use]
pub fn format_summary(outcome: &SuiteOutcome) -> String {
    format!(
        "{}: {} passed, {} failed, {} total in {}",
        outcome.suite_name,
        outcome.passed_count(),
        outcome.failed_count(),
        outcome.total() + outcome.skipped,
        format_duration(outcome.duration)
    )
}

/// Format a duration for display
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
