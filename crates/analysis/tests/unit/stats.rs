//! Usage Accounting Tests.
//!
//! Verifies the accumulator arithmetic and the shared handle a caller keeps
//! while a policy drives the recorder.

use pretty_assertions::assert_eq;

use tacet_core::policy::ReplacementPolicy;
use tacet_core::stats::{SharedUsageStats, UsageRecorder, UsageStats};

use crate::common::{A, B, addr, lru_policy};

/// Totals and peaks accumulate across reports.
#[test]
fn totals_and_peaks_accumulate() {
    let mut stats = UsageStats::default();
    stats.record(1, 64, 2);
    stats.record(1, 256, 6);
    stats.record(1, 128, 4);

    assert_eq!(stats.states_recorded, 3);
    assert_eq!(stats.total_allocated_bytes, 448);
    assert_eq!(stats.total_maintained_entries, 12);
    assert_eq!(stats.peak_allocated_bytes, 256);
    assert_eq!(stats.peak_maintained_entries, 6);
}

/// Means are zero before any report and exact afterwards.
#[test]
fn means_are_well_defined() {
    let mut stats = UsageStats::default();
    assert_eq!(stats.mean_allocated_bytes(), 0.0);
    assert_eq!(stats.mean_maintained_entries(), 0.0);

    stats.record(1, 100, 3);
    stats.record(1, 200, 5);
    assert_eq!(stats.mean_allocated_bytes(), 150.0);
    assert_eq!(stats.mean_maintained_entries(), 4.0);
}

/// A policy reports one state per update through the shared handle.
#[test]
fn policy_reports_through_shared_handle() {
    let shared = SharedUsageStats::new();
    let mut policy = lru_policy(4).with_recorder(Box::new(shared.clone()));

    let blank = policy.blank_state();
    let s1 = policy.update(&blank, addr(A)).unwrap();
    let _ = policy.update(&s1, addr(B)).unwrap();

    let snapshot = shared.snapshot();
    assert_eq!(snapshot.states_recorded, 2);
    // One 32-byte line after the first access, two after the second.
    assert_eq!(snapshot.total_allocated_bytes, 32 + 64);
    assert_eq!(snapshot.peak_maintained_entries, 4);
}

/// Joins report the produced state as well.
#[test]
fn joins_are_recorded() {
    let shared = SharedUsageStats::new();
    let mut policy = lru_policy(4).with_recorder(Box::new(shared.clone()));

    let blank = policy.blank_state();
    let joined = policy.join(std::slice::from_ref(&blank)).unwrap();
    assert!(joined.must_set.is_empty());
    assert_eq!(shared.snapshot().states_recorded, 1);
}
