// src/exec/runtime.rs

//! The invocation driver.
//!
//! A single driver thread owns the registry and all run state. It computes
//! the plan, pushes waves through the pool (or a sequential loop), and then
//! unconditionally runs the post phase: failure hooks when errors were
//! captured, final hooks always, external cleanup, and the closing reports.

use std::io::Write;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::RunSettings;
use crate::dag;
use crate::errors::Result;
use crate::exec::pool::run_wave;
use crate::exec::runner::{run_hooks, run_single_target};
use crate::exec::sink::BuildSink;
use crate::exec::state::RunState;
use crate::exec::{RunSummary, RunningOrder};
use crate::registry::{Registry, Target};
use crate::report;

/// Run the target named `target` (or a meta flag) against `registry`.
///
/// Never panics or returns early on target failures: errors are captured
/// into the returned [`RunSummary`], whose [`exit_code`] the caller's
/// `main` is expected to apply.
///
/// [`exit_code`]: RunSummary::exit_code
pub fn run(
    registry: &Registry,
    settings: &RunSettings,
    sink: &dyn BuildSink,
    out: &mut dyn Write,
    target: &str,
) -> RunSummary {
    if matches!(target, "--dotGraph" | "-dg") {
        report_or_warn(report::write_dot_graph(out, registry).map_err(Into::into));
        return RunSummary::empty();
    }
    if matches!(target, "--listTargets" | "-lt") || settings.list {
        report_or_warn(report::write_target_list(out, registry).map_err(Into::into));
        return RunSummary::empty();
    }

    let clock = Instant::now();
    let state = RunState::new();
    let mut order = None;

    // Scheduling errors (unknown targets, dangling dependency names) are
    // captured like body failures so the post phase still runs and the exit
    // code reflects the failure.
    if let Err(err) = drive(registry, settings, sink, out, target, &state, &mut order) {
        state.record_error(target, err.into(), sink, settings.print_stack_trace);
    }

    state.begin_drain();
    if state.has_errors() {
        run_hooks(
            &registry.activated_failure_targets(),
            &state,
            sink,
            settings.print_stack_trace,
        );
    }
    run_hooks(
        &registry.activated_final_targets(),
        &state,
        sink,
        settings.print_stack_trace,
    );
    sink.kill_created_processes();
    if state.has_errors() {
        sink.close_open_tags();
    }

    let summary = state.into_summary(order, clock.elapsed(), settings.failure_exit_code);
    report_or_warn(report::write_time_summary(out, &summary).map_err(Into::into));
    if !summary.succeeded() {
        report_or_warn(report::write_error_summary(out, &summary).map_err(Into::into));
    }
    summary
}

#[allow(clippy::too_many_arguments)]
fn drive(
    registry: &Registry,
    settings: &RunSettings,
    sink: &dyn BuildSink,
    out: &mut dyn Write,
    target: &str,
    state: &RunState,
    order: &mut Option<RunningOrder>,
) -> Result<()> {
    report::write_shortened_graph(out, registry, target)?;

    let waves: Vec<Vec<&Target>> = if settings.single_target {
        info!(name = %target, "single-target mode, dependencies skipped");
        vec![vec![registry.get(target)?]]
    } else {
        dag::determine_build_order(registry, target)?
    };

    if settings.parallel_jobs > 1 {
        let grouped = RunningOrder::Grouped(
            waves
                .iter()
                .map(|wave| wave.iter().map(|t| t.name.clone()).collect())
                .collect(),
        );
        report::write_running_order(out, &grouped)?;
        *order = Some(grouped);

        for wave in &waves {
            run_wave(
                wave,
                settings.parallel_jobs,
                state,
                sink,
                settings.print_stack_trace,
            );
        }
    } else {
        let flat: Vec<&Target> = waves.into_iter().flatten().collect();
        *order = Some(RunningOrder::Serial(
            flat.iter().map(|t| t.name.clone()).collect(),
        ));

        for next in flat {
            run_single_target(next, state, sink, settings.print_stack_trace);
        }
    }

    Ok(())
}

fn report_or_warn(result: Result<()>) {
    if let Err(err) = result {
        warn!(error = %err, "failed to write report");
    }
}
