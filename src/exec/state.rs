// src/exec/state.rs

//! Per-run mutable state.
//!
//! Worker threads touch this only through [`RunState::record_executed`] and
//! [`RunState::record_error`]; everything else happens on the driver thread
//! between waves.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use tracing::error;

use crate::errors::{BuildFailure, FailedTests};
use crate::exec::sink::BuildSink;
use crate::exec::{ErrorRecord, RunPhase, RunSummary, RunningOrder};

#[derive(Debug, Default)]
struct ExecutedLog {
    names: HashSet<String>,
    times: Vec<(String, Duration)>,
}

#[derive(Debug)]
struct ErrorLog {
    records: Vec<ErrorRecord>,
    phase: RunPhase,
}

#[derive(Debug)]
pub(crate) struct RunState {
    executed: Mutex<ExecutedLog>,
    errors: Mutex<ErrorLog>,
}

impl RunState {
    pub(crate) fn new() -> Self {
        Self {
            executed: Mutex::new(ExecutedLog::default()),
            errors: Mutex::new(ErrorLog {
                records: Vec::new(),
                phase: RunPhase::Running,
            }),
        }
    }

    /// Record a successfully completed body. Completion order across all
    /// worker threads is whatever order the lock is taken in.
    pub(crate) fn record_executed(&self, name: &str, duration: Duration) {
        let mut log = self.executed.lock().unwrap();
        log.names.insert(name.to_string());
        log.times.push((name.to_string(), duration));
    }

    /// Capture a target-body failure.
    ///
    /// Structured [`BuildFailure`] payloads contribute their summary first,
    /// then one record per sub-message. [`FailedTests`] is recorded the same
    /// way but never forwarded to the vendor sink, since the test runner
    /// already reported it. Everything else is one record, vendor-notified.
    pub(crate) fn record_error(
        &self,
        target: &str,
        err: anyhow::Error,
        sink: &dyn BuildSink,
        include_chain: bool,
    ) {
        let mut log = self.errors.lock().unwrap();
        if log.phase == RunPhase::Running {
            log.phase = RunPhase::Failed;
        }

        if let Some(failed) = err.downcast_ref::<FailedTests>() {
            error!(name = %target, summary = %failed.summary, "tests failed");
            push(&mut log.records, target, failed.summary.clone());
            for message in &failed.messages {
                push(&mut log.records, target, message.clone());
            }
        } else if let Some(build) = err.downcast_ref::<BuildFailure>() {
            error!(name = %target, summary = %build.summary, "target failed");
            sink.vendor_error(&build.summary);
            push(&mut log.records, target, build.summary.clone());
            for message in &build.messages {
                push(&mut log.records, target, message.clone());
            }
        } else {
            let message = if include_chain {
                format!("{err:?}")
            } else {
                err.to_string()
            };
            error!(name = %target, message = %message, "target failed");
            sink.vendor_error(&message);
            push(&mut log.records, target, message);
        }
    }

    /// Whether the current phase short-circuits target bodies. Hooks run in
    /// the `Draining` phase, which never skips.
    pub(crate) fn should_skip(&self) -> bool {
        self.errors.lock().unwrap().phase == RunPhase::Failed
    }

    /// Enter the hook phase.
    pub(crate) fn begin_drain(&self) {
        self.errors.lock().unwrap().phase = RunPhase::Draining;
    }

    pub(crate) fn has_errors(&self) -> bool {
        !self.errors.lock().unwrap().records.is_empty()
    }

    pub(crate) fn into_summary(
        self,
        order: Option<RunningOrder>,
        total: Duration,
        failure_exit_code: i32,
    ) -> RunSummary {
        let executed = self.executed.into_inner().unwrap();
        let errors = self.errors.into_inner().unwrap();
        RunSummary {
            executed: executed.names,
            executed_times: executed.times,
            errors: errors.records,
            order,
            total,
            failure_exit_code,
        }
    }
}

fn push(records: &mut Vec<ErrorRecord>, target: &str, message: String) {
    records.push(ErrorRecord {
        target: target.to_string(),
        message,
    });
}
