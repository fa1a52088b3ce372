// tests/parallel.rs

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use makedag::config::RunSettings;
use makedag::exec::{self, RunningOrder};
use makedag_test_utils::builders::RegistryBuilder;
use makedag_test_utils::recording::RecordingSink;

fn parallel_settings(jobs: usize) -> RunSettings {
    RunSettings {
        parallel_jobs: jobs,
        ..RunSettings::default()
    }
}

#[test]
fn diamond_runs_waves_in_order() {
    init_tracing();
    let (registry, log) = RegistryBuilder::new()
        .target("A")
        .target("B1")
        .target("B2")
        .target("C")
        .hard("C", "B1")
        .hard("C", "B2")
        .hard("B1", "A")
        .hard("B2", "A")
        .build();

    let sink = RecordingSink::new();
    let mut out = Vec::new();
    let summary = exec::run(&registry, &parallel_settings(4), &sink, &mut out, "C");

    assert!(summary.succeeded());
    let expected: std::collections::HashSet<String> =
        ["A", "B1", "B2", "C"].iter().map(|s| s.to_string()).collect();
    assert_eq!(summary.executed, expected);

    // A strictly first, C strictly last; B1/B2 in either order between.
    let names = log.names();
    assert_eq!(names.first().map(String::as_str), Some("A"));
    assert_eq!(names.last().map(String::as_str), Some("C"));
    assert_eq!(names.len(), 4);

    assert_eq!(
        summary.order,
        Some(RunningOrder::Grouped(vec![
            vec!["A".to_string()],
            vec!["B1".to_string(), "B2".to_string()],
            vec!["C".to_string()],
        ]))
    );
}

#[test]
fn wave_barrier_waits_for_slow_targets() {
    init_tracing();
    // Slow and Fast share a wave; Last runs in the following wave and must
    // observe both, even though Fast finishes long before Slow.
    let (registry, log) = RegistryBuilder::new()
        .sleeping_target("Slow", Duration::from_millis(150))
        .target("Fast")
        .target("Last")
        .hard("Last", "Slow")
        .hard("Last", "Fast")
        .build();

    let sink = RecordingSink::new();
    let mut out = Vec::new();
    let summary = exec::run(&registry, &parallel_settings(2), &sink, &mut out, "Last");

    assert!(summary.succeeded());
    let names = log.names();
    assert_eq!(names.last().map(String::as_str), Some("Last"));
    assert!(names.contains(&"Slow".to_string()));
    assert!(names.contains(&"Fast".to_string()));
}

#[test]
fn failure_lets_current_wave_drain_then_skips_later_waves() {
    init_tracing();
    // Fail and Slow share the first wave. The failure must not cancel Slow,
    // but Root (next wave) must be skipped. Fail's delay guarantees Slow is
    // already in flight when the error is recorded.
    let (registry, log) = RegistryBuilder::new()
        .delayed_failing_target("Fail", Duration::from_millis(50), "boom")
        .sleeping_target("Slow", Duration::from_millis(150))
        .target("Root")
        .hard("Root", "Slow")
        .hard("Root", "Fail")
        .build();

    let sink = RecordingSink::new();
    let mut out = Vec::new();
    let summary = exec::run(&registry, &parallel_settings(2), &sink, &mut out, "Root");

    assert!(!summary.succeeded());
    let names = log.names();
    assert!(names.contains(&"Fail".to_string()));
    assert!(names.contains(&"Slow".to_string()), "in-flight wave targets drain");
    assert!(!names.contains(&"Root".to_string()), "later waves short-circuit");
    assert!(summary.executed.contains("Slow"));
    assert!(!summary.executed.contains("Root"));
}

#[test]
fn parallel_degree_one_is_equivalent_to_sequential() {
    init_tracing();
    let (registry, log) = RegistryBuilder::new()
        .target("A")
        .target("B")
        .hard("B", "A")
        .build();

    let sink = RecordingSink::new();
    let mut out = Vec::new();
    let summary = exec::run(&registry, &parallel_settings(1), &sink, &mut out, "B");

    assert!(summary.succeeded());
    assert_eq!(log.names(), vec!["A", "B"]);
    assert!(matches!(summary.order, Some(RunningOrder::Serial(_))));
}

#[test]
fn hooks_run_after_parallel_failures() {
    init_tracing();
    let (registry, log) = RegistryBuilder::new()
        .failing_target("A", "boom")
        .target("B")
        .target("Root")
        .hard("Root", "A")
        .hard("Root", "B")
        .final_target("Notify", true)
        .failure_target("Cleanup", true)
        .build();

    let sink = RecordingSink::new();
    let mut out = Vec::new();
    let summary = exec::run(&registry, &parallel_settings(4), &sink, &mut out, "Root");

    assert!(!summary.succeeded());
    let names = log.names();
    assert!(names.contains(&"Cleanup".to_string()));
    assert!(names.contains(&"Notify".to_string()));
    // Hooks run on the driver after all waves, so they come last.
    let cleanup_pos = names.iter().position(|n| n == "Cleanup").unwrap();
    let notify_pos = names.iter().position(|n| n == "Notify").unwrap();
    assert!(cleanup_pos < notify_pos);
}
