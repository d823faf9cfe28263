//! Storeprobe CLI: run checkout acceptance scenarios
//!
//! ## Usage
//!
//! ```bash
//! storeprobe run                                  # Demo purchase in chromium
//! storeprobe run -s checkout.yaml --driver mock   # Scenario file, in-memory store
//! storeprobe pages                                # Page objects and locators
//! storeprobe config -c storeprobe.yaml            # Effective configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use storeprobe_cli::{
    load_suite, resolve_config, run_suite, Cli, CliConfig, CliError, CliResult, ColorChoice,
    Commands, ConfigArgs, OutputFormat, PagesArgs, Reporter, RunArgs, Verbosity,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::ScenariosFailed { .. }) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Run(args) => run_scenarios(config, &args),
        Commands::Pages(args) => run_pages(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}

fn run_scenarios(config: CliConfig, args: &RunArgs) -> CliResult<()> {
    let probe_config = resolve_config(&args.overrides)?;
    let suite = load_suite(args)?;
    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());

    if config.verbosity.is_verbose() {
        reporter.line(&format!(
            "Running {} scenario(s) from {} against {}",
            suite.scenarios.len(),
            suite.name,
            probe_config.base_url
        ));
    }

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(run_suite(args, &probe_config, &suite))?;
    reporter.suite(&outcome);

    if outcome.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: outcome.failed_count(),
            total: outcome.total() + outcome.skipped,
        })
    }
}

fn run_pages(args: &PagesArgs) -> CliResult<()> {
    let catalog = storeprobe::pages::catalog();
    match args.format {
        OutputFormat::Yaml => print!("{}", serde_yaml_ng::to_string(&catalog)?),
        OutputFormat::Text => {
            for page in &catalog {
                println!("{}", page.kind);
                for (name, locator) in &page.locators {
                    println!("  {name:<20} {locator}");
                }
            }
            println!(
                "  (inventory add buttons: {})",
                storeprobe::pages::inventory::add_to_cart_button("<product>")
            );
        }
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    let config = resolve_config(&args.overrides)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
