//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Storeprobe: run checkout acceptance scenarios against a storefront
#[derive(Parser, Debug)]
#[command(name = "storeprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios
    Run(RunArgs),

    /// List page objects and their locators
    Pages(PagesArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Settings shared by commands that resolve a configuration
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Store URL opened at the start of each scenario
    #[arg(long, env = "STOREPROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// Element wait timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Interval between element lookups in milliseconds
    #[arg(long)]
    pub poll_ms: Option<u64>,

    /// Take the first of several matching elements instead of failing
    #[arg(long)]
    pub first_match: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scenario suite (YAML); the built-in demo purchase when omitted
    #[arg(short, long)]
    pub scenarios: Option<PathBuf>,

    /// Session driver
    #[arg(short, long, default_value = "chromium")]
    pub driver: DriverArg,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Configuration overrides
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Arguments for the pages command
#[derive(Parser, Debug)]
pub struct PagesArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration overrides
    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Session driver
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Headless chromium over CDP
    #[default]
    Chromium,
    /// In-memory demo storefront
    Mock,
}

/// Listing format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// YAML
    Yaml,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
