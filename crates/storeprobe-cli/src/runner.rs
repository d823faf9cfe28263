//! Scenario execution for the `run` command

use crate::commands::{ConfigOverrides, DriverArg, RunArgs};
use crate::error::{CliError, CliResult};
use storeprobe::{
    MatchPolicy, ProbeConfig, ScenarioRunner, ScenarioSuite, SessionFactory, Storefront,
    SuiteOutcome,
};
use tracing::info;

/// Configuration file (if any) with command-line overrides applied
pub fn resolve_config(overrides: &ConfigOverrides) -> CliResult<ProbeConfig> {
    let mut config = match overrides.config {
        Some(ref path) => ProbeConfig::load(path).map_err(|e| {
            CliError::config(format!("{}: {e}", path.display()))
        })?,
        None => ProbeConfig::default(),
    };

    if let Some(ref url) = overrides.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(timeout_ms) = overrides.timeout_ms {
        config.wait.timeout_ms = timeout_ms;
    }
    if let Some(poll_ms) = overrides.poll_ms {
        config.wait.poll_interval_ms = poll_ms;
    }
    if overrides.first_match {
        config.matching = MatchPolicy::First;
    }
    if overrides.headed {
        config.browser.headless = false;
    }
    if overrides.no_sandbox {
        config.browser.sandbox = false;
    }

    config.validate()?;
    Ok(config)
}

/// Suite from `--scenarios`, or the demo purchase
pub fn load_suite(args: &RunArgs) -> CliResult<ScenarioSuite> {
    match args.scenarios {
        Some(ref path) => ScenarioSuite::load(path)
            .map_err(|e| CliError::config(format!("{}: {e}", path.display()))),
        None => Ok(ScenarioSuite::demo()),
    }
}

/// Run `suite` with the selected driver
pub async fn run_suite(
    args: &RunArgs,
    config: &ProbeConfig,
    suite: &ScenarioSuite,
) -> CliResult<SuiteOutcome> {
    let fail_fast = args.fail_fast || config.fail_fast;
    info!(
        suite = %suite.name,
        scenarios = suite.scenarios.len(),
        driver = ?args.driver,
        "starting run"
    );
    match args.driver {
        DriverArg::Mock => {
            let mut store = Storefront::new();
            if config.credentials.is_some() {
                store = store.starting_at_login();
            }
            Ok(execute(store, config, fail_fast, suite).await)
        }
        DriverArg::Chromium => run_chromium(config, fail_fast, suite).await,
    }
}

async fn execute<F: SessionFactory>(
    factory: F,
    config: &ProbeConfig,
    fail_fast: bool,
    suite: &ScenarioSuite,
) -> SuiteOutcome {
    ScenarioRunner::new(factory)
        .with_policy(config.wait)
        .with_match_policy(config.matching)
        .with_fail_fast(fail_fast)
        .with_login(config.credentials.as_ref())
        .run(suite)
        .await
}

#[cfg(feature = "browser")]
async fn run_chromium(
    config: &ProbeConfig,
    fail_fast: bool,
    suite: &ScenarioSuite,
) -> CliResult<SuiteOutcome> {
    let factory = storeprobe::ChromiumFactory::new(config.browser.clone(), config.base_url.clone());
    Ok(execute(factory, config, fail_fast, suite).await)
}

#[cfg(not(feature = "browser"))]
async fn run_chromium(
    _config: &ProbeConfig,
    _fail_fast: bool,
    _suite: &ScenarioSuite,
) -> CliResult<SuiteOutcome> {
    Err(CliError::invalid_argument(
        "chromium driver requires the `browser` feature; use --driver mock",
    ))
}
