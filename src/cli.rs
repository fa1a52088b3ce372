// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `makedag` itself is a library; the targets live in the downstream build
//! binary. That binary reuses this parser so every makedag-based runner
//! accepts the same flags.

use clap::{Parser, ValueEnum};

use crate::config::RunSettings;

/// Command-line arguments for a makedag build runner.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "makedag",
    version,
    about = "Run build targets with DAG-ordered parallelism.",
    long_about = None
)]
pub struct CliArgs {
    /// Target to run. The well-known meta names `--listTargets`/`-lt` and
    /// `--dotGraph`/`-dg` are accepted here too.
    #[arg(value_name = "TARGET", allow_hyphen_values = true)]
    pub target: Option<String>,

    /// Maximum number of targets of one wave to run in parallel.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Run only the named target's body, skipping all dependencies.
    #[arg(long)]
    pub single_target: bool,

    /// List the available targets and exit.
    #[arg(long)]
    pub list_targets: bool,

    /// Print the dependency graph in DOT format and exit.
    #[arg(long)]
    pub dot_graph: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MAKEDAG_LOG` or a default level will be used.
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

impl CliArgs {
    /// Lay the CLI flags over settings read from the environment.
    pub fn apply(&self, settings: &mut RunSettings) {
        if let Some(jobs) = self.jobs {
            settings.parallel_jobs = jobs.max(1);
        }
        if self.single_target {
            settings.single_target = true;
        }
        if self.list_targets {
            settings.list = true;
        }
    }
}
