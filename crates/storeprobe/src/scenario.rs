//! Scenario definitions and the sequential runner.
//!
//! A scenario is a named list of [`Step`]s loaded from YAML. The runner gives
//! every scenario its own session and its own [`StepBinder`], so no page
//! object or element state crosses scenario boundaries.

use crate::driver::Session;
use crate::harness::{ScenarioOutcome, SuiteOutcome};
use crate::interaction::Interactor;
use crate::result::{ProbeError, ProbeResult};
use crate::steps::{Step, StepBinder};
use crate::wait::{MatchPolicy, WaitPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// A named sequence of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    pub name: String,
    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create an empty scenario
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// Scenarios run together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSuite {
    /// Suite name
    #[serde(default = "default_suite_name")]
    pub name: String,
    /// Scenarios in run order
    pub scenarios: Vec<Scenario>,
}

fn default_suite_name() -> String {
    "scenarios".to_string()
}

impl ScenarioSuite {
    /// Parse a suite from YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a scenario has no name.
    pub fn from_yaml_str(yaml: &str) -> ProbeResult<Self> {
        let suite: Self = serde_yaml_ng::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a suite from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Check scenario names
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a blank scenario name.
    pub fn validate(&self) -> ProbeResult<()> {
        if let Some(index) = self.scenarios.iter().position(|s| s.name.trim().is_empty()) {
            return Err(ProbeError::invalid_config(format!(
                "scenario #{} has no name",
                index + 1
            )));
        }
        Ok(())
    }

    /// The single happy-path purchase of the demo store
    #[must_use]
    pub fn demo() -> Self {
        Self {
            name: "checkout".to_string(),
            scenarios: vec![Scenario::new("Successful purchase")
                .with_step(Step::AddToCart {
                    product: "Sauce Labs Backpack".to_string(),
                })
                .with_step(Step::ProceedToCheckout)
                .with_step(Step::EnterShippingDetails {
                    first_name: "John".to_string(),
                    last_name: "Doe".to_string(),
                    postal_code: "12345".to_string(),
                })
                .with_step(Step::CompletePurchase)
                .with_step(Step::ExpectConfirmation {
                    message: "Thank you for your order!".to_string(),
                })],
        }
    }
}

/// Opens one fresh session per scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Session type produced
    type Session: Session + 'static;

    /// Open a session showing the store's start page
    async fn open(&self) -> ProbeResult<Self::Session>;
}

/// Sign-in details prepended to every scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    fn step(&self) -> Step {
        Step::LogIn {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Runs scenarios one after another
#[derive(Debug)]
pub struct ScenarioRunner<F> {
    factory: F,
    policy: WaitPolicy,
    matching: MatchPolicy,
    fail_fast: bool,
    login: Option<Step>,
}

impl<F: SessionFactory> ScenarioRunner<F> {
    /// Create a runner with default waits and strict matching
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            policy: WaitPolicy::default(),
            matching: MatchPolicy::default(),
            fail_fast: false,
            login: None,
        }
    }

    /// Set the wait policy
    #[must_use]
    pub const fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set how multiple matches are treated
    #[must_use]
    pub const fn with_match_policy(mut self, matching: MatchPolicy) -> Self {
        self.matching = matching;
        self
    }

    /// Stop after the first failing scenario
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Sign in before each scenario's own steps
    #[must_use]
    pub fn with_login(mut self, credentials: Option<&Credentials>) -> Self {
        self.login = credentials.map(Credentials::step);
        self
    }

    /// Get the session factory
    #[must_use]
    pub const fn factory(&self) -> &F {
        &self.factory
    }

    /// Run a suite
    pub async fn run(&self, suite: &ScenarioSuite) -> SuiteOutcome {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.scenarios.len());
        let mut skipped = 0;

        for (index, scenario) in suite.scenarios.iter().enumerate() {
            let outcome = self.run_scenario(scenario).await;
            let failed = !outcome.passed;
            results.push(outcome);
            if failed && self.fail_fast {
                skipped = suite.scenarios.len() - index - 1;
                if skipped > 0 {
                    warn!(skipped, "fail-fast: skipping remaining scenarios");
                }
                break;
            }
        }

        SuiteOutcome {
            suite_name: suite.name.clone(),
            results,
            skipped,
            duration: start.elapsed(),
        }
    }

    /// Run one scenario on a fresh session.
    ///
    /// If the session is still open when the steps end, pass or fail, it is
    /// quit here. A failing cleanup quit is logged and does not change the
    /// outcome.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioOutcome {
        let start = Instant::now();
        let steps: Vec<&Step> = self.login.iter().chain(&scenario.steps).collect();
        let total = steps.len();
        info!(scenario = %scenario.name, steps = total, "running scenario");

        let session = match self.factory.open().await {
            Ok(session) => session,
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "could not open session");
                return ScenarioOutcome::fail(&scenario.name, e.to_string(), 0, total)
                    .with_duration(start.elapsed());
            }
        };

        let ui = Interactor::new(&session, self.policy).with_match_policy(self.matching);
        let mut binder = StepBinder::new(ui);
        let mut completed = 0;
        let mut failure = None;
        for step in steps {
            if let Err(e) = binder.apply(step).await {
                warn!(scenario = %scenario.name, %step, error = %e, "step failed");
                failure = Some(e);
                break;
            }
            completed += 1;
        }

        if !binder.is_released() {
            debug!(scenario = %scenario.name, "quitting session left open");
            if let Err(e) = binder.release().await {
                warn!(scenario = %scenario.name, error = %e, "cleanup quit failed");
            }
        }

        let outcome = match failure {
            None => ScenarioOutcome::pass(&scenario.name, total),
            Some(e) => ScenarioOutcome::fail(&scenario.name, e.to_string(), completed, total),
        };
        info!(scenario = %scenario.name, passed = outcome.passed, "scenario finished");
        outcome.with_duration(start.elapsed())
    }
}
