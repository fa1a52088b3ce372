// src/errors.rs

//! Crate-wide error types.
//!
//! Admission and configuration problems are reported synchronously through
//! [`MakedagError`]; target bodies return `anyhow::Result<()>` and may carry
//! one of the structured failure payloads below, which the executor recovers
//! with `downcast_ref` when recording errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MakedagError {
    #[error("Cyclic dependency: '{child}' already depends on '{parent}'")]
    CyclicDependency { parent: String, child: String },

    #[error("Target not found: '{name}'. Known targets: {known}")]
    TargetNotFound { name: String, known: String },

    #[error("Target already registered: '{0}'")]
    DuplicateTarget(String),

    #[error("Description already set for target '{0}'")]
    DescriptionAlreadySet(String),

    #[error("No {kind} target registered under '{name}'")]
    HookNotRegistered { kind: &'static str, name: String },

    #[error("No target specified")]
    NoTargetSpecified,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MakedagError>;

/// Structured failure raised by a target body when a build step produced
/// several distinct error messages. The executor records the summary first,
/// then one entry per sub-message.
#[derive(Error, Debug)]
#[error("{summary}")]
pub struct BuildFailure {
    pub summary: String,
    pub messages: Vec<String>,
}

impl BuildFailure {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_messages(
        summary: impl Into<String>,
        messages: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            summary: summary.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Failure raised by a target body that ran a test suite. Recorded like
/// [`BuildFailure`] but never forwarded to the vendor sink, since the test
/// runner is assumed to have reported the failures itself.
#[derive(Error, Debug)]
#[error("{summary}")]
pub struct FailedTests {
    pub summary: String,
    pub messages: Vec<String>,
}

impl FailedTests {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            messages: Vec::new(),
        }
    }

    pub fn with_messages(
        summary: impl Into<String>,
        messages: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            summary: summary.into(),
            messages: messages.into_iter().map(Into::into).collect(),
        }
    }
}
