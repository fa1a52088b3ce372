// src/exec/sink.rs

//! Pluggable build notification sink.
//!
//! The executor talks to a [`BuildSink`] instead of a concrete reporter.
//! Production builds use [`TracingSink`]; CI integrations implement the
//! trait to forward errors to their vendor's annotation format and to tear
//! down any processes their target bodies started. Tests can provide a
//! recording implementation.

use tracing::{debug, error, info};

/// Notification surface the executor consumes. Implementations must be
/// callable from worker threads.
pub trait BuildSink: Send + Sync {
    /// A target body is about to run.
    fn target_started(&self, name: &str, description: Option<&str>, dependencies: &str);

    /// A target body completed successfully. Not called on failure; a sink
    /// holding open output sections reconciles in [`close_open_tags`].
    ///
    /// [`close_open_tags`]: BuildSink::close_open_tags
    fn target_finished(&self, name: &str);

    /// A captured error that should reach the CI vendor.
    fn vendor_error(&self, message: &str);

    /// Close any output sections left open by failed targets.
    fn close_open_tags(&self);

    /// Tear down external processes created by target bodies.
    fn kill_created_processes(&self);
}

/// Default sink: everything becomes a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl BuildSink for TracingSink {
    fn target_started(&self, name: &str, description: Option<&str>, dependencies: &str) {
        match description {
            Some(description) => {
                info!(name = %name, description = %description, dependencies = %dependencies, "starting target")
            }
            None => info!(name = %name, dependencies = %dependencies, "starting target"),
        }
    }

    fn target_finished(&self, name: &str) {
        info!(name = %name, "finished target");
    }

    fn vendor_error(&self, message: &str) {
        error!(message = %message, "build error");
    }

    fn close_open_tags(&self) {
        debug!("no open output sections to close");
    }

    fn kill_created_processes(&self) {
        debug!("no external process tracker configured");
    }
}
