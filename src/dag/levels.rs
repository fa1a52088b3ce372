// src/dag/levels.rs

//! Wave computation.
//!
//! Every target reachable from the run root is assigned an integer level;
//! larger levels run earlier. A target first seen at depth `d` starts at
//! level `d`; re-encountering it deeper raises it to the new depth, and the
//! raise cascades through its effective children so every hard or
//! soft-activated edge `parent -> child` ends up with
//! `level(parent) < level(child)`. An on-path guard stops the cascade from
//! looping over soft-activated cycles.
//!
//! Grouping by level then yields waves in which all targets are mutually
//! independent, which is exactly the parallelism the executor consumes.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::dag::traversal::{effective_children, hard_closure, visit_dependencies};
use crate::errors::Result;
use crate::registry::{Registry, Target};

/// Compute the execution plan for `root` as a list of waves, deepest level
/// first: running the waves in order, each to completion, is a legal
/// topological execution of the effective graph.
///
/// Within a wave, targets keep the order in which the walk first saw them.
pub fn determine_build_order<'a>(
    registry: &'a Registry,
    root: &str,
) -> Result<Vec<Vec<&'a Target>>> {
    let closure = hard_closure(registry, root)?;

    let mut levels: HashMap<String, i64> = HashMap::new();
    let (_visited, ordered) = visit_dependencies(registry, root, |visit| {
        let key = visit.target.name.to_lowercase();
        let depth = visit.depth as i64;
        match levels.get(&key).copied() {
            None => {
                levels.insert(key, depth);
            }
            Some(level) if depth > level => {
                let mut on_path = HashSet::new();
                raise_level(registry, &closure, &mut levels, &key, depth, &mut on_path);
            }
            _ => {}
        }
    })?;

    let first_seen: HashMap<&str, usize> = ordered
        .iter()
        .enumerate()
        .map(|(idx, key)| (key.as_str(), idx))
        .collect();

    let mut by_level: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (key, level) in &levels {
        by_level.entry(*level).or_default().push(key.clone());
    }

    let mut waves = Vec::with_capacity(by_level.len());
    for (level, mut keys) in by_level.into_iter().rev() {
        keys.sort_by_key(|key| first_seen.get(key.as_str()).copied().unwrap_or(usize::MAX));
        trace!(level = level, targets = ?keys, "wave computed");
        let wave = keys
            .iter()
            .map(|key| registry.get(key))
            .collect::<Result<Vec<_>>>()?;
        waves.push(wave);
    }

    debug!(root = %root, waves = waves.len(), "build order determined");
    Ok(waves)
}

/// Raise `key` to `new_level` and push the raise through its effective
/// children so each stays strictly above its parents. Nodes already at or
/// above the requested level are left alone; nodes on the current cascade
/// path are skipped to terminate soft-activated cycles.
fn raise_level(
    registry: &Registry,
    hard_set: &HashSet<String>,
    levels: &mut HashMap<String, i64>,
    key: &str,
    new_level: i64,
    on_path: &mut HashSet<String>,
) {
    match levels.get(key) {
        Some(&current) if current >= new_level => return,
        None => return,
        _ => {}
    }
    levels.insert(key.to_string(), new_level);
    on_path.insert(key.to_string());

    if let Ok(target) = registry.get(key) {
        for (_kind, child) in effective_children(target, hard_set) {
            let child_key = child.to_lowercase();
            if !on_path.contains(&child_key) {
                raise_level(registry, hard_set, levels, &child_key, new_level + 1, on_path);
            }
        }
    }

    on_path.remove(key);
}
