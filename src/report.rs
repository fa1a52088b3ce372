// src/report.rs

//! Human-readable and DOT reports over the registry and run state.
//!
//! Every reporter writes to a caller-supplied [`Write`], so tests assert on
//! exact output and production code passes stdout.

use std::io::Write;

use crate::dag::{visit_dependencies, EdgeKind};
use crate::errors::Result;
use crate::exec::{RunSummary, RunningOrder};
use crate::registry::Registry;

const HARD_ARROW: &str = "<==";
const SOFT_ARROW: &str = "<=?";

/// Dependency graph of `root`, first visits only.
pub fn write_shortened_graph(
    out: &mut dyn Write,
    registry: &Registry,
    root: &str,
) -> Result<()> {
    write_graph(out, registry, root, false)
}

/// Dependency graph of `root` including repeat visits.
pub fn write_verbose_graph(out: &mut dyn Write, registry: &Registry, root: &str) -> Result<()> {
    write_graph(out, registry, root, true)
}

fn write_graph(
    out: &mut dyn Write,
    registry: &Registry,
    root: &str,
    include_repeats: bool,
) -> Result<()> {
    writeln!(out, "Dependency graph for target '{root}':")?;

    let mut io_result = Ok(());
    visit_dependencies(registry, root, |visit| {
        if io_result.is_err() || (visit.already_visited && !include_repeats) {
            return;
        }
        let indent = "  ".repeat(visit.depth);
        let arrow = match visit.kind {
            EdgeKind::Hard => HARD_ARROW,
            EdgeKind::Soft => SOFT_ARROW,
        };
        io_result = writeln!(out, "{indent}{arrow} {}", visit.target.name);
    })?;
    io_result?;
    Ok(())
}

/// DOT rendering of the whole registry: one node per registered target, one
/// edge per dependency, soft edges dotted. The shape is stable.
pub fn write_dot_graph(out: &mut dyn Write, registry: &Registry) -> std::io::Result<()> {
    writeln!(out, "digraph G {{")?;
    writeln!(out, "  rankdir=TB;")?;
    writeln!(out, "  node [shape=box];")?;
    for target in registry.targets() {
        writeln!(out, "  \"{}\";", target.name)?;
    }
    for target in registry.targets() {
        for dep in &target.hard_deps {
            writeln!(out, "  \"{}\" -> \"{dep}\";", target.name)?;
        }
        for dep in &target.soft_deps {
            writeln!(out, "  \"{}\" -> \"{dep}\" [style=dotted];", target.name)?;
        }
    }
    writeln!(out, "}}")?;
    Ok(())
}

/// All registered targets with their descriptions.
pub fn write_target_list(out: &mut dyn Write, registry: &Registry) -> std::io::Result<()> {
    writeln!(out, "The following targets are available:")?;
    for target in registry.targets() {
        match &target.description {
            Some(description) => writeln!(out, "  {} - {description}", target.name)?,
            None => writeln!(out, "  {}", target.name)?,
        }
    }
    Ok(())
}

/// The computed plan: a flat list for sequential runs, `Group - k` blocks
/// for parallel runs.
pub fn write_running_order(out: &mut dyn Write, order: &RunningOrder) -> std::io::Result<()> {
    writeln!(out, "The running order is:")?;
    match order {
        RunningOrder::Serial(names) => {
            for name in names {
                writeln!(out, "  - {name}")?;
            }
        }
        RunningOrder::Grouped(groups) => {
            for (idx, group) in groups.iter().enumerate() {
                writeln!(out, "Group - {}", idx + 1)?;
                for name in group {
                    writeln!(out, "  - {name}")?;
                }
            }
        }
    }
    Ok(())
}

/// Per-target durations, padded to the longest name, with a total and the
/// final status line.
pub fn write_time_summary(out: &mut dyn Write, summary: &RunSummary) -> std::io::Result<()> {
    let width = summary
        .executed_times
        .iter()
        .map(|(name, _)| name.len())
        .chain(std::iter::once("Total".len()))
        .max()
        .unwrap_or(0);

    writeln!(out, "Build time report")?;
    for (name, duration) in &summary.executed_times {
        writeln!(out, "{name:width$}   {}", format_duration(*duration))?;
    }
    writeln!(out, "{:width$}   {}", "Total", format_duration(summary.total))?;
    let status = if summary.succeeded() { "Ok" } else { "Failure" };
    writeln!(out, "Status: {status}")?;
    Ok(())
}

/// Accumulated errors with 1-based indices.
pub fn write_error_summary(out: &mut dyn Write, summary: &RunSummary) -> std::io::Result<()> {
    writeln!(out, "Errors:")?;
    for (idx, record) in summary.errors.iter().enumerate() {
        writeln!(out, "  {}) {}: {}", idx + 1, record.target, record.message)?;
    }
    Ok(())
}

fn format_duration(duration: std::time::Duration) -> String {
    format!("{:.4}s", duration.as_secs_f64())
}
