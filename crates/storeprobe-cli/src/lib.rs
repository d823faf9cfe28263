//! Storeprobe CLI Library
//!
//! Command-line interface for running Storeprobe scenarios.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, ConfigOverrides, DriverArg, OutputFormat, PagesArgs,
    RunArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{format_duration, format_scenario, format_summary, Reporter};
pub use runner::{load_suite, resolve_config, run_suite};
