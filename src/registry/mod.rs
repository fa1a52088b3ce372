// src/registry/mod.rs

//! Target registry: owns all target identity plus the two hook sets.
//!
//! - [`target`] defines [`Target`], the [`TargetSpec`] builder and
//!   [`TargetTemplate`].
//! - The registry itself stores targets keyed case-insensitively (the
//!   canonical display casing is whatever was registered first) and two
//!   insertion-ordered hook lists: final hooks (always run after a build)
//!   and build-failure hooks (run only when errors were captured). Hooks
//!   participate only when explicitly activated.

pub mod target;

use std::collections::HashMap;

use crate::errors::{MakedagError, Result};

pub use target::{Target, TargetBody, TargetSpec, TargetTemplate};

#[derive(Debug, Clone)]
struct HookEntry {
    key: String,
    activated: bool,
}

/// In-memory store of target definitions and hook activation flags.
///
/// An owned value rather than process-global state; a process that runs
/// several independent builds either creates a fresh registry per build or
/// calls [`Registry::reset`] between them.
#[derive(Default)]
pub struct Registry {
    /// Lowercase name -> target.
    targets: HashMap<String, Target>,
    /// Lowercase keys in insertion order.
    order: Vec<String>,
    final_hooks: Vec<HookEntry>,
    failure_hooks: Vec<HookEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a target. Rejects names already registered under
    /// case-insensitive comparison, then applies the spec's dependency lists
    /// through admission (so the named targets must already exist and the
    /// edges must not close a cycle).
    pub fn register(&mut self, spec: TargetSpec) -> Result<()> {
        let key = spec.name.to_lowercase();
        if self.targets.contains_key(&key) {
            return Err(MakedagError::DuplicateTarget(spec.name));
        }

        // Resolve dependency names up front so a bad spec leaves the
        // registry untouched. Admission below cannot fail after this: no
        // edge can point back at a target that was just created.
        for dep in spec.hard_deps.iter().chain(spec.soft_deps.iter()) {
            if !self.contains(dep) {
                return Err(self.not_found(dep));
            }
        }

        let name = spec.name.clone();
        let hard = spec.hard_deps;
        let soft = spec.soft_deps;

        self.targets.insert(
            key.clone(),
            Target {
                name: spec.name,
                description: spec.description,
                hard_deps: Vec::new(),
                soft_deps: Vec::new(),
                body: spec.body,
            },
        );
        self.order.push(key);

        crate::dag::add_hard_deps(self, &name, &hard)?;
        crate::dag::add_soft_deps(self, &name, &soft)?;
        Ok(())
    }

    /// Install a target and list it as a final hook (not yet activated).
    pub fn register_final(&mut self, spec: TargetSpec) -> Result<()> {
        let key = spec.name.to_lowercase();
        self.register(spec)?;
        self.final_hooks.push(HookEntry {
            key,
            activated: false,
        });
        Ok(())
    }

    /// Install a target and list it as a build-failure hook (not yet
    /// activated).
    pub fn register_build_failure(&mut self, spec: TargetSpec) -> Result<()> {
        let key = spec.name.to_lowercase();
        self.register(spec)?;
        self.failure_hooks.push(HookEntry {
            key,
            activated: false,
        });
        Ok(())
    }

    pub fn activate_final(&mut self, name: &str) -> Result<()> {
        Self::activate(&mut self.final_hooks, name, "final")
    }

    pub fn activate_build_failure(&mut self, name: &str) -> Result<()> {
        Self::activate(&mut self.failure_hooks, name, "build-failure")
    }

    fn activate(hooks: &mut [HookEntry], name: &str, kind: &'static str) -> Result<()> {
        let key = name.to_lowercase();
        match hooks.iter_mut().find(|h| h.key == key) {
            Some(entry) => {
                entry.activated = true;
                Ok(())
            }
            None => Err(MakedagError::HookNotRegistered {
                kind,
                name: name.to_string(),
            }),
        }
    }

    /// Case-insensitive lookup. The error message lists every known target
    /// so a typo in a build script is immediately diagnosable.
    pub fn get(&self, name: &str) -> Result<&Target> {
        self.targets
            .get(&name.to_lowercase())
            .ok_or_else(|| self.not_found(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Result<&mut Target> {
        let key = name.to_lowercase();
        if !self.targets.contains_key(&key) {
            return Err(self.not_found(name));
        }
        // Double lookup keeps the borrow checker happy without an unwrap in
        // the miss path.
        match self.targets.get_mut(&key) {
            Some(target) => Ok(target),
            None => unreachable!("presence checked above"),
        }
    }

    fn not_found(&self, name: &str) -> MakedagError {
        MakedagError::TargetNotFound {
            name: name.to_string(),
            known: self.target_names().collect::<Vec<_>>().join(", "),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(&name.to_lowercase())
    }

    /// Canonical names in registration order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|k| self.targets[k].name.as_str())
    }

    /// Targets in registration order.
    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.order.iter().map(|k| &self.targets[k])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Activated final hooks in registration order.
    pub fn activated_final_targets(&self) -> Vec<&Target> {
        self.activated(&self.final_hooks)
    }

    /// Activated build-failure hooks in registration order.
    pub fn activated_failure_targets(&self) -> Vec<&Target> {
        self.activated(&self.failure_hooks)
    }

    fn activated(&self, hooks: &[HookEntry]) -> Vec<&Target> {
        hooks
            .iter()
            .filter(|h| h.activated)
            .map(|h| &self.targets[&h.key])
            .collect()
    }

    /// Clear all targets and hooks so the process can set up an independent
    /// build.
    pub fn reset(&mut self) {
        self.targets.clear();
        self.order.clear();
        self.final_hooks.clear();
        self.failure_hooks.clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("targets", &self.order)
            .field("final_hooks", &self.final_hooks)
            .field("failure_hooks", &self.failure_hooks)
            .finish()
    }
}
