// src/registry/target.rs

//! Target definitions and the builder used to register them.

use std::fmt;
use std::sync::Arc;

use crate::errors::{MakedagError, Result};

/// Opaque side-effecting work attached to a target. Bodies may fail (via the
/// returned `Result`) or panic; the executor captures both.
pub type TargetBody = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// A named build step with a body and ordered dependency lists.
///
/// Dependency lists hold the canonical (as-registered) names of other
/// targets; they are only ever extended through admission, which resolves
/// names and rejects cycles.
#[derive(Clone)]
pub struct Target {
    /// Canonical display name (casing as first registered).
    pub name: String,
    pub description: Option<String>,
    /// Targets that must complete before this one runs and that are pulled
    /// into any run rooted here.
    pub hard_deps: Vec<String>,
    /// Targets that must complete first *if* they are scheduled anyway.
    pub soft_deps: Vec<String>,
    pub body: TargetBody,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hard_deps", &self.hard_deps)
            .field("soft_deps", &self.soft_deps)
            .finish_non_exhaustive()
    }
}

/// Builder for a target registration.
///
/// Replaces the ambient "pending description" slot with explicit state:
/// the description belongs to the spec it was written on, and setting it
/// twice is an error.
pub struct TargetSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) body: TargetBody,
    pub(crate) hard_deps: Vec<String>,
    pub(crate) soft_deps: Vec<String>,
}

impl fmt::Debug for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("hard_deps", &self.hard_deps)
            .field("soft_deps", &self.soft_deps)
            .finish_non_exhaustive()
    }
}

impl TargetSpec {
    /// Start a spec for `name` with a no-op body and no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            body: Arc::new(|| Ok(())),
            hard_deps: Vec::new(),
            soft_deps: Vec::new(),
        }
    }

    /// Attach a human-readable description. One-shot: a second call fails.
    pub fn describe(mut self, text: impl Into<String>) -> Result<Self> {
        if self.description.is_some() {
            return Err(MakedagError::DescriptionAlreadySet(self.name));
        }
        self.description = Some(text.into());
        Ok(self)
    }

    pub fn body<F>(mut self, f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.body = Arc::new(f);
        self
    }

    pub(crate) fn body_arc(mut self, body: TargetBody) -> Self {
        self.body = body;
        self
    }

    /// Hard dependencies applied through admission when the spec is
    /// registered. The named targets must already exist at that point.
    pub fn hard_deps(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.hard_deps.extend(deps.into_iter().map(Into::into));
        self
    }

    /// Soft dependencies applied through admission when the spec is
    /// registered.
    pub fn soft_deps(mut self, deps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.soft_deps.extend(deps.into_iter().map(Into::into));
        self
    }
}

/// Convenience for families of targets that share a dependency prefix and a
/// parameterised body.
pub struct TargetTemplate<P> {
    default_deps: Vec<String>,
    factory: Box<dyn Fn(P) -> TargetBody + Send + Sync>,
}

impl<P> TargetTemplate<P> {
    pub fn new<B, F>(
        default_deps: impl IntoIterator<Item = impl Into<String>>,
        factory: F,
    ) -> Self
    where
        B: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
        F: Fn(P) -> B + Send + Sync + 'static,
    {
        Self {
            default_deps: default_deps.into_iter().map(Into::into).collect(),
            factory: Box::new(move |param| Arc::new(factory(param)) as TargetBody),
        }
    }

    /// Register a target named `name` whose body is `factory(param)` and
    /// which hard-depends on the template's default dependencies.
    pub fn instantiate(
        &self,
        registry: &mut super::Registry,
        name: impl Into<String>,
        param: P,
    ) -> Result<()> {
        let body = (self.factory)(param);
        registry.register(
            TargetSpec::new(name)
                .body_arc(body)
                .hard_deps(self.default_deps.iter().cloned()),
        )
    }
}
