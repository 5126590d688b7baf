// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `stalecheck`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stalecheck",
    version,
    about = "Rebuild declared targets when their inputs are newer than their outputs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Stalecheck.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Stalecheck.toml")]
    pub config: String,

    /// Restrict the run to this target and its dependency closure.
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Treat every evaluated target as stale, regardless of timestamps.
    #[arg(long)]
    pub force: bool,

    /// Report staleness decisions without running any build action.
    #[arg(long)]
    pub check: bool,

    /// Parse + validate, print targets, but don't evaluate or build.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STALECHECK_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
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
