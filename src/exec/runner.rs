// src/exec/runner.rs

//! Single-target execution.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use anyhow::anyhow;
use tracing::trace;

use crate::exec::sink::BuildSink;
use crate::exec::state::RunState;
use crate::registry::Target;

/// Run one target body.
///
/// Skips (without invoking the body) when an earlier failure moved the run
/// into the `Failed` phase. Otherwise times the body, captures panics as
/// well as returned errors, and records the outcome through the state's
/// guarded recorders. Failures are accumulated, never re-raised.
pub(crate) fn run_single_target(
    target: &Target,
    state: &RunState,
    sink: &dyn BuildSink,
    include_chain: bool,
) {
    if state.should_skip() {
        trace!(name = %target.name, "skipping target after earlier failure");
        return;
    }

    sink.target_started(
        &target.name,
        target.description.as_deref(),
        &target.hard_deps.join(", "),
    );

    let body = Arc::clone(&target.body);
    let started = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| body()));
    let elapsed = started.elapsed();

    match outcome {
        Ok(Ok(())) => {
            state.record_executed(&target.name, elapsed);
            sink.target_finished(&target.name);
        }
        Ok(Err(err)) => {
            state.record_error(&target.name, err, sink, include_chain);
        }
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "target body panicked".to_string()
            };
            state.record_error(&target.name, anyhow!(message), sink, include_chain);
        }
    }
}

/// Run hook bodies in registration order. Each runs in its own capture
/// scope with the usual timing and error recording; hooks never
/// short-circuit on earlier failures, which is the entire point of hooks.
pub(crate) fn run_hooks(
    hooks: &[&Target],
    state: &RunState,
    sink: &dyn BuildSink,
    include_chain: bool,
) {
    for hook in hooks {
        run_single_target(hook, state, sink, include_chain);
    }
}
