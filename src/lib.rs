// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod report;

use std::io;

use crate::cli::CliArgs;
use crate::config::RunSettings;
use crate::errors::{MakedagError, Result};
use crate::exec::{RunSummary, TracingSink};
use crate::registry::Registry;

/// High-level entry point for build binaries.
///
/// Resolves settings from the environment, lays the CLI flags on top and
/// runs the requested target against the given registry, reporting to
/// stdout. The caller is expected to exit with
/// [`RunSummary::exit_code`].
///
/// ```no_run
/// use makedag::registry::{Registry, TargetSpec};
///
/// fn main() -> makedag::errors::Result<()> {
///     let args = makedag::cli::parse();
///     makedag::logging::init_logging(args.log_level)?;
///
///     let mut registry = Registry::new();
///     registry.register(TargetSpec::new("Clean").body(|| Ok(())))?;
///
///     let summary = makedag::run_build(&registry, &args)?;
///     std::process::exit(summary.exit_code())
/// }
/// ```
pub fn run_build(registry: &Registry, args: &CliArgs) -> Result<RunSummary> {
    let mut settings = RunSettings::from_env();
    args.apply(&mut settings);

    let target = if args.dot_graph {
        "--dotGraph".to_string()
    } else if args.list_targets || settings.list {
        "--listTargets".to_string()
    } else {
        args.target
            .clone()
            .ok_or(MakedagError::NoTargetSpecified)?
    };

    let sink = TracingSink;
    let mut stdout = io::stdout().lock();
    Ok(exec::run(registry, &settings, &sink, &mut stdout, &target))
}
