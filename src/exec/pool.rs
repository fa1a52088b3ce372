// src/exec/pool.rs

//! Bounded worker pool for one wave.
//!
//! Targets of a wave are mutually independent, so they are fanned out over a
//! job channel to scoped worker threads. The `thread::scope` join is the
//! wave barrier: the driver does not continue until every body of the wave
//! has returned.

use std::sync::{mpsc, Mutex};

use tracing::debug;

use crate::exec::runner::run_single_target;
use crate::exec::sink::BuildSink;
use crate::exec::state::RunState;
use crate::registry::Target;

pub(crate) fn run_wave(
    wave: &[&Target],
    parallel_jobs: usize,
    state: &RunState,
    sink: &dyn BuildSink,
    include_chain: bool,
) {
    let workers = parallel_jobs.min(wave.len());
    if workers <= 1 {
        for &target in wave {
            run_single_target(target, state, sink, include_chain);
        }
        return;
    }

    debug!(workers = workers, targets = wave.len(), "running wave");

    let (job_tx, job_rx) = mpsc::channel::<&Target>();
    let job_rx = Mutex::new(job_rx);
    let job_rx = &job_rx;

    std::thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(move || loop {
                let target = match job_rx.lock().unwrap().recv() {
                    Ok(target) => target,
                    Err(_) => break,
                };
                run_single_target(target, state, sink, include_chain);
            });
        }

        for &target in wave {
            // Workers only exit once the channel closes below, so sends
            // cannot fail while the scope is alive.
            let _ = job_tx.send(target);
        }
        drop(job_tx);
    });
}
