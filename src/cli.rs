// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::persist::DEFAULT_OUTPUT_PATH;
use crate::types::Seed;

/// Command-line arguments for `detdag`.
///
/// Every flag has a default, so running `detdag` with no arguments loads
/// `Detdag.toml`, runs it and writes `result.json`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "detdag",
    version,
    about = "Run a task DAG deterministically from a seed.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Seed for this run; overrides `[config].seed`.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub seed: Option<Seed>,

    /// Where to write the result artifact (JSON).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DETDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Don't print task progress to stdout.
    #[arg(long)]
    pub quiet: bool,

    /// Parse + validate, print the execution plan, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
