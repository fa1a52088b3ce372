// src/dag/traversal.rs

//! Reusable depth-first walk over a target's dependency graph.
//!
//! The walk runs in two passes. A pre-pass follows only hard edges and
//! collects the hard-reachable closure of the root. The main pass then
//! treats a soft edge as present only when its child is inside that closure,
//! so soft edges order targets that run anyway but never pull extra targets
//! into a run.
//!
//! The visitor is invoked for every visit, including repeats; recursion
//! descends only on the first visit of a target, which both produces the
//! first-seen pre-order listing and terminates walks over soft-activated
//! cycles.

use std::collections::HashSet;

use crate::dag::EdgeKind;
use crate::errors::Result;
use crate::registry::{Registry, Target};

/// One visit of the walk. `parent` is absent for the root.
#[derive(Debug)]
pub struct Visit<'a> {
    pub parent: Option<&'a Target>,
    pub target: &'a Target,
    pub kind: EdgeKind,
    pub depth: usize,
    pub already_visited: bool,
}

/// Lowercase keys of every target reachable from `root` over hard edges,
/// including the root itself.
pub fn hard_closure(registry: &Registry, root: &str) -> Result<HashSet<String>> {
    let children = |target: &Target| {
        target
            .hard_deps
            .iter()
            .map(|d| (EdgeKind::Hard, d.clone()))
            .collect()
    };
    let (visited, _ordered) = walk(registry, root, &children, &mut |_| {})?;
    Ok(visited)
}

/// Walk the effective dependency graph of `root`, invoking `visit` for every
/// visit. Returns the visited set and the first-seen pre-order listing, both
/// as lowercase keys.
pub fn visit_dependencies<F>(
    registry: &Registry,
    root: &str,
    mut visit: F,
) -> Result<(HashSet<String>, Vec<String>)>
where
    F: FnMut(&Visit<'_>),
{
    let closure = hard_closure(registry, root)?;
    let children = move |target: &Target| effective_children(target, &closure);
    walk(registry, root, &children, &mut visit)
}

/// Effective children of a target: its hard dependencies, followed by the
/// soft dependencies whose child is hard-reachable from the run root. A soft
/// edge that duplicates a hard one is dropped; hard wins.
pub(crate) fn effective_children(
    target: &Target,
    hard_set: &HashSet<String>,
) -> Vec<(EdgeKind, String)> {
    let mut children: Vec<(EdgeKind, String)> = target
        .hard_deps
        .iter()
        .map(|d| (EdgeKind::Hard, d.clone()))
        .collect();

    for soft in &target.soft_deps {
        let activated = hard_set.contains(&soft.to_lowercase());
        let shadowed = target
            .hard_deps
            .iter()
            .any(|h| h.eq_ignore_ascii_case(soft));
        if activated && !shadowed {
            children.push((EdgeKind::Soft, soft.clone()));
        }
    }

    children
}

fn walk<C, F>(
    registry: &Registry,
    root: &str,
    children: &C,
    visit: &mut F,
) -> Result<(HashSet<String>, Vec<String>)>
where
    C: Fn(&Target) -> Vec<(EdgeKind, String)>,
    F: FnMut(&Visit<'_>),
{
    let mut visited = HashSet::new();
    let mut ordered = Vec::new();
    walk_from(
        registry,
        children,
        None,
        EdgeKind::Hard,
        root,
        0,
        &mut visited,
        &mut ordered,
        visit,
    )?;
    Ok((visited, ordered))
}

#[allow(clippy::too_many_arguments)]
fn walk_from<C, F>(
    registry: &Registry,
    children: &C,
    parent: Option<&Target>,
    kind: EdgeKind,
    name: &str,
    depth: usize,
    visited: &mut HashSet<String>,
    ordered: &mut Vec<String>,
    visit: &mut F,
) -> Result<()>
where
    C: Fn(&Target) -> Vec<(EdgeKind, String)>,
    F: FnMut(&Visit<'_>),
{
    // Unresolved names surface here, making dangling dependency lists a
    // schedule-time error.
    let target = registry.get(name)?;
    let key = target.name.to_lowercase();
    let already_visited = !visited.insert(key.clone());

    visit(&Visit {
        parent,
        target,
        kind,
        depth,
        already_visited,
    });

    if !already_visited {
        ordered.push(key);
        for (child_kind, child) in children(target) {
            walk_from(
                registry,
                children,
                Some(target),
                child_kind,
                &child,
                depth + 1,
                visited,
                ordered,
                visit,
            )?;
        }
    }

    Ok(())
}
