// tests/build_order.rs

mod common;
use crate::common::init_tracing;

use std::collections::{HashMap, HashSet};

use makedag::dag::{add_hard_dep, add_soft_dep, determine_build_order, hard_closure};
use makedag::registry::{Registry, TargetSpec};

fn registry_with(names: &[&str]) -> Registry {
    let mut registry = Registry::new();
    for name in names {
        registry.register(TargetSpec::new(*name)).unwrap();
    }
    registry
}

fn wave_names(registry: &Registry, root: &str) -> Vec<Vec<String>> {
    determine_build_order(registry, root)
        .unwrap()
        .into_iter()
        .map(|wave| wave.into_iter().map(|t| t.name.clone()).collect())
        .collect()
}

/// Assert that every effective edge `parent -> child` of the plan has the
/// child in a strictly earlier wave, and that no wave contains a dependent
/// pair.
fn assert_plan_is_legal(registry: &Registry, root: &str, waves: &[Vec<String>]) {
    let closure = hard_closure(registry, root).unwrap();
    let mut wave_of: HashMap<String, usize> = HashMap::new();
    for (idx, wave) in waves.iter().enumerate() {
        for name in wave {
            wave_of.insert(name.to_lowercase(), idx);
        }
    }

    for (parent, parent_wave) in &wave_of {
        let target = registry.get(parent).unwrap();
        let mut effective: Vec<&String> = target.hard_deps.iter().collect();
        for soft in &target.soft_deps {
            if closure.contains(&soft.to_lowercase()) {
                effective.push(soft);
            }
        }
        for child in effective {
            let child_wave = wave_of
                .get(&child.to_lowercase())
                .unwrap_or_else(|| panic!("dependency {child} of {parent} not planned"));
            assert!(
                child_wave < parent_wave,
                "{child} must run strictly before {parent}"
            );
        }
    }
}

#[test]
fn linear_chain_is_one_target_per_wave() {
    init_tracing();
    let mut registry = registry_with(&["A", "B", "C"]);
    add_hard_dep(&mut registry, "C", "B").unwrap();
    add_hard_dep(&mut registry, "B", "A").unwrap();

    let waves = wave_names(&registry, "C");
    assert_eq!(waves, vec![vec!["A"], vec!["B"], vec!["C"]]);
    assert_plan_is_legal(&registry, "C", &waves);
}

#[test]
fn diamond_produces_parallel_middle_wave() {
    init_tracing();
    let mut registry = registry_with(&["A", "B1", "B2", "C"]);
    add_hard_dep(&mut registry, "C", "B1").unwrap();
    add_hard_dep(&mut registry, "C", "B2").unwrap();
    add_hard_dep(&mut registry, "B1", "A").unwrap();
    add_hard_dep(&mut registry, "B2", "A").unwrap();

    let waves = wave_names(&registry, "C");
    assert_eq!(waves, vec![vec!["A"], vec!["B1", "B2"], vec!["C"]]);
    assert_plan_is_legal(&registry, "C", &waves);
}

#[test]
fn only_the_rooted_subgraph_is_planned() {
    init_tracing();
    let mut registry = registry_with(&["A", "B", "Unrelated"]);
    add_hard_dep(&mut registry, "A", "B").unwrap();

    let waves = wave_names(&registry, "A");
    let planned: HashSet<String> = waves.into_iter().flatten().collect();
    assert_eq!(
        planned,
        HashSet::from(["A".to_string(), "B".to_string()])
    );
}

#[test]
fn soft_edge_orders_targets_within_the_plan() {
    init_tracing();
    // A hard-depends on B and X; B soft-depends on X. X must come first.
    let mut registry = registry_with(&["A", "B", "X"]);
    add_hard_dep(&mut registry, "A", "B").unwrap();
    add_hard_dep(&mut registry, "A", "X").unwrap();
    add_soft_dep(&mut registry, "A", "X").unwrap();
    add_soft_dep(&mut registry, "B", "X").unwrap();

    let waves = wave_names(&registry, "A");
    assert_eq!(waves, vec![vec!["X"], vec!["B"], vec!["A"]]);
    assert_plan_is_legal(&registry, "A", &waves);
}

#[test]
fn soft_edge_to_unscheduled_target_does_not_pull_it_in() {
    init_tracing();
    let mut registry = registry_with(&["A", "B", "X"]);
    add_hard_dep(&mut registry, "A", "B").unwrap();
    add_soft_dep(&mut registry, "A", "X").unwrap();

    let waves = wave_names(&registry, "A");
    assert_eq!(waves, vec![vec!["B"], vec!["A"]]);
}

#[test]
fn late_deepening_cascades_through_the_subtree() {
    init_tracing();
    // Root -> A -> C and Root -> B -> A: the walk sees A at depth 1 first,
    // then again at depth 2 below B. Both A and its child C must move.
    let mut registry = registry_with(&["Root", "A", "B", "C"]);
    add_hard_dep(&mut registry, "Root", "A").unwrap();
    add_hard_dep(&mut registry, "Root", "B").unwrap();
    add_hard_dep(&mut registry, "A", "C").unwrap();
    add_hard_dep(&mut registry, "B", "A").unwrap();

    let waves = wave_names(&registry, "Root");
    assert_eq!(
        waves,
        vec![vec!["C"], vec!["A"], vec!["B"], vec!["Root"]]
    );
    assert_plan_is_legal(&registry, "Root", &waves);
}

#[test]
fn shared_dependency_sits_in_the_deepest_wave_needed() {
    init_tracing();
    let mut registry = registry_with(&["Root", "Fast", "Slow", "Mid", "Shared"]);
    add_hard_dep(&mut registry, "Root", "Fast").unwrap();
    add_hard_dep(&mut registry, "Root", "Slow").unwrap();
    add_hard_dep(&mut registry, "Fast", "Shared").unwrap();
    add_hard_dep(&mut registry, "Slow", "Mid").unwrap();
    add_hard_dep(&mut registry, "Mid", "Shared").unwrap();

    let waves = wave_names(&registry, "Root");
    assert_plan_is_legal(&registry, "Root", &waves);
    // Shared is needed at depth 3 through Slow -> Mid, so it runs first.
    assert_eq!(waves[0], vec!["Shared"]);
}

#[test]
fn unknown_root_is_an_error() {
    init_tracing();
    let registry = registry_with(&["A"]);
    assert!(determine_build_order(&registry, "Missing").is_err());
}
