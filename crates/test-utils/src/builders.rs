#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::bail;
use makedag::dag;
use makedag::registry::{Registry, TargetSpec};

/// Shared record of body executions, in completion order.
#[derive(Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str) {
        self.entries.lock().unwrap().push(name.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().unwrap().iter().any(|n| n == name)
    }
}

/// Builder for a registry whose target bodies record themselves into a
/// shared [`ExecutionLog`], to simplify test setup.
pub struct RegistryBuilder {
    registry: Registry,
    log: ExecutionLog,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            log: ExecutionLog::new(),
        }
    }

    /// A target whose body records its own name.
    pub fn target(mut self, name: &str) -> Self {
        let spec = self.tracking_spec(name);
        self.registry
            .register(spec)
            .expect("failed to register target");
        self
    }

    /// A target with a description.
    pub fn described_target(mut self, name: &str, description: &str) -> Self {
        let spec = self
            .tracking_spec(name)
            .describe(description)
            .expect("description already set");
        self.registry
            .register(spec)
            .expect("failed to register target");
        self
    }

    /// A target that records its name, then fails with `message`.
    pub fn failing_target(mut self, name: &str, message: &str) -> Self {
        let log = self.log.clone();
        let owned = name.to_string();
        let message = message.to_string();
        self.registry
            .register(TargetSpec::new(name).body(move || {
                log.push(&owned);
                bail!("{message}")
            }))
            .expect("failed to register target");
        self
    }

    /// A target that records its name, then panics with `message`.
    pub fn panicking_target(mut self, name: &str, message: &str) -> Self {
        let log = self.log.clone();
        let owned = name.to_string();
        let message = message.to_string();
        self.registry
            .register(TargetSpec::new(name).body(move || {
                log.push(&owned);
                panic!("{message}")
            }))
            .expect("failed to register target");
        self
    }

    /// A target that sleeps, records its name, then fails. The delay keeps
    /// failure-while-in-flight tests deterministic.
    pub fn delayed_failing_target(
        mut self,
        name: &str,
        delay: Duration,
        message: &str,
    ) -> Self {
        let log = self.log.clone();
        let owned = name.to_string();
        let message = message.to_string();
        self.registry
            .register(TargetSpec::new(name).body(move || {
                std::thread::sleep(delay);
                log.push(&owned);
                bail!("{message}")
            }))
            .expect("failed to register target");
        self
    }

    /// A target that sleeps before recording, for wave-barrier tests.
    pub fn sleeping_target(mut self, name: &str, duration: Duration) -> Self {
        let log = self.log.clone();
        let owned = name.to_string();
        self.registry
            .register(TargetSpec::new(name).body(move || {
                std::thread::sleep(duration);
                log.push(&owned);
                Ok(())
            }))
            .expect("failed to register target");
        self
    }

    /// A recording final hook, optionally activated.
    pub fn final_target(mut self, name: &str, activated: bool) -> Self {
        let spec = self.tracking_spec(name);
        self.registry
            .register_final(spec)
            .expect("failed to register final target");
        if activated {
            self.registry
                .activate_final(name)
                .expect("failed to activate final target");
        }
        self
    }

    /// A recording build-failure hook, optionally activated.
    pub fn failure_target(mut self, name: &str, activated: bool) -> Self {
        let spec = self.tracking_spec(name);
        self.registry
            .register_build_failure(spec)
            .expect("failed to register build-failure target");
        if activated {
            self.registry
                .activate_build_failure(name)
                .expect("failed to activate build-failure target");
        }
        self
    }

    pub fn hard(mut self, parent: &str, child: &str) -> Self {
        dag::add_hard_dep(&mut self.registry, parent, child).expect("hard edge rejected");
        self
    }

    pub fn soft(mut self, parent: &str, child: &str) -> Self {
        dag::add_soft_dep(&mut self.registry, parent, child).expect("soft edge rejected");
        self
    }

    pub fn build(self) -> (Registry, ExecutionLog) {
        (self.registry, self.log)
    }

    fn tracking_spec(&self, name: &str) -> TargetSpec {
        let log = self.log.clone();
        let owned = name.to_string();
        TargetSpec::new(name).body(move || {
            log.push(&owned);
            Ok(())
        })
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
