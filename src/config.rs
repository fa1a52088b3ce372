// src/config.rs

//! Run settings, read from the ambient environment.
//!
//! Priority for every knob: CLI flag (applied by the caller via
//! [`crate::cli::CliArgs::apply`]), then environment variable, then the
//! default. Invalid environment values fall back to the default with a
//! warning rather than aborting a build over a typo.

use tracing::warn;

pub const ENV_PARALLEL_JOBS: &str = "MAKEDAG_PARALLEL_JOBS";
pub const ENV_SINGLE_TARGET: &str = "MAKEDAG_SINGLE_TARGET";
pub const ENV_LIST: &str = "MAKEDAG_LIST";
pub const ENV_EXIT_CODE: &str = "MAKEDAG_EXIT_CODE";
pub const ENV_STACK_TRACE: &str = "MAKEDAG_STACK_TRACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Maximum targets of one wave running at once. 1 means sequential.
    pub parallel_jobs: usize,
    /// Run only the root target's body, skipping all dependencies.
    pub single_target: bool,
    /// List targets instead of running; equivalent to `--listTargets`.
    pub list: bool,
    /// Process exit code to report when errors were captured.
    pub failure_exit_code: i32,
    /// Record the full error chain instead of the display form.
    pub print_stack_trace: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            parallel_jobs: 1,
            single_target: false,
            list: false,
            failure_exit_code: 42,
            print_stack_trace: false,
        }
    }
}

impl RunSettings {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source (tests pass a map).
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(value) = get(ENV_PARALLEL_JOBS) {
            match value.trim().parse::<usize>() {
                Ok(jobs) if jobs >= 1 => settings.parallel_jobs = jobs,
                _ => warn!(
                    value = %value,
                    "invalid {ENV_PARALLEL_JOBS}, expected an integer >= 1; using {}",
                    settings.parallel_jobs
                ),
            }
        }

        if let Some(value) = get(ENV_SINGLE_TARGET) {
            settings.single_target = truthy(&value);
        }
        if let Some(value) = get(ENV_LIST) {
            settings.list = truthy(&value);
        }

        if let Some(value) = get(ENV_EXIT_CODE) {
            match value.trim().parse::<i32>() {
                Ok(code) => settings.failure_exit_code = code,
                Err(_) => warn!(
                    value = %value,
                    "invalid {ENV_EXIT_CODE}, expected an integer; using {}",
                    settings.failure_exit_code
                ),
            }
        }

        if let Some(value) = get(ENV_STACK_TRACE) {
            settings.print_stack_trace = truthy(&value);
        }

        settings
    }
}

/// Boolean-ish parsing for flag-style environment variables.
pub fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
