// src/dag/admission.rs

//! Edge admission.
//!
//! Every edge enters the graph through one of the functions here. Both
//! endpoint names must resolve, and the new edge must not close a cycle over
//! the *same* edge kind: soft edges express "run first if both are
//! scheduled" and must never make the hard graph unschedulable, so they are
//! checked against the soft sub-graph only.

use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::EdgeKind;
use crate::errors::{MakedagError, Result};
use crate::registry::{Registry, Target};

/// Append a hard edge `parent -> child`.
pub fn add_hard_dep(registry: &mut Registry, parent: &str, child: &str) -> Result<()> {
    let child_name = admit(registry, EdgeKind::Hard, parent, child)?;
    registry.get_mut(parent)?.hard_deps.push(child_name);
    Ok(())
}

/// Prepend a hard edge `parent -> child`, so reporters list it first.
pub fn add_hard_dep_front(registry: &mut Registry, parent: &str, child: &str) -> Result<()> {
    let child_name = admit(registry, EdgeKind::Hard, parent, child)?;
    registry.get_mut(parent)?.hard_deps.insert(0, child_name);
    Ok(())
}

/// Append a soft edge `parent -> child`.
pub fn add_soft_dep(registry: &mut Registry, parent: &str, child: &str) -> Result<()> {
    let child_name = admit(registry, EdgeKind::Soft, parent, child)?;
    registry.get_mut(parent)?.soft_deps.push(child_name);
    Ok(())
}

/// Append hard edges to each child, left to right.
pub fn add_hard_deps<S: AsRef<str>>(
    registry: &mut Registry,
    parent: &str,
    children: &[S],
) -> Result<()> {
    for child in children {
        add_hard_dep(registry, parent, child.as_ref())?;
    }
    Ok(())
}

/// Append soft edges to each child, left to right.
pub fn add_soft_deps<S: AsRef<str>>(
    registry: &mut Registry,
    parent: &str,
    children: &[S],
) -> Result<()> {
    for child in children {
        add_soft_dep(registry, parent, child.as_ref())?;
    }
    Ok(())
}

/// Resolve both endpoints and verify the edge keeps the same-kind sub-graph
/// acyclic. Returns the child's canonical name for insertion.
fn admit(registry: &Registry, kind: EdgeKind, parent: &str, child: &str) -> Result<String> {
    let parent_name = registry.get(parent)?.name.clone();
    let child_name = registry.get(child)?.name.clone();

    if parent_name.eq_ignore_ascii_case(&child_name) {
        return Err(MakedagError::CyclicDependency {
            parent: parent_name,
            child: child_name,
        });
    }

    // Reachability over existing same-kind edges: if `parent` is already a
    // transitive dependency of `child`, the new edge would close a cycle.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for target in registry.targets() {
        graph.add_node(target.name.as_str());
        for dep in deps_of_kind(target, kind) {
            graph.add_edge(target.name.as_str(), dep.as_str(), ());
        }
    }

    if has_path_connecting(&graph, child_name.as_str(), parent_name.as_str(), None) {
        return Err(MakedagError::CyclicDependency {
            parent: parent_name,
            child: child_name,
        });
    }

    debug!(parent = %parent_name, child = %child_name, ?kind, "edge admitted");
    Ok(child_name)
}

fn deps_of_kind(target: &Target, kind: EdgeKind) -> &[String] {
    match kind {
        EdgeKind::Hard => &target.hard_deps,
        EdgeKind::Soft => &target.soft_deps,
    }
}
