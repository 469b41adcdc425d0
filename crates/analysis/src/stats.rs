//! Usage accounting for produced abstract states.
//!
//! The policies tell a recorder, after every `update` and `join`, how much of
//! the modeled memory the freshly produced state occupies. The enclosing
//! estimator uses this for its reports; the analysis itself never reads it
//! back. This module provides:
//! 1. **The sink interface:** `UsageRecorder`, a fire-and-forget callback
//!    that never blocks and never fails.
//! 2. **An accumulator:** `UsageStats`, tracking totals and peaks.
//! 3. **A shared handle:** `SharedUsageStats`, so the caller can keep reading
//!    an accumulator it has handed to a policy.

use std::cell::RefCell;
use std::rc::Rc;

/// Sink for per-state occupancy reports.
pub trait UsageRecorder {
    /// Records one freshly produced state.
    ///
    /// # Arguments
    ///
    /// * `state_count` - Number of states this report covers (one per
    ///   `update`/`join` call).
    /// * `allocated_bytes` - Byte footprint of the MAY set, the
    ///   over-approximation of real occupancy.
    /// * `maintained_entries` - Entries tracked across both sets.
    fn record(&mut self, state_count: u32, allocated_bytes: u64, maintained_entries: u64);
}

/// Accumulated occupancy statistics across an analysis run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageStats {
    /// Number of states recorded.
    pub states_recorded: u64,
    /// Sum of the byte footprints of all recorded states.
    pub total_allocated_bytes: u64,
    /// Sum of the entry counts of all recorded states.
    pub total_maintained_entries: u64,
    /// Largest single-state byte footprint observed.
    pub peak_allocated_bytes: u64,
    /// Largest single-state entry count observed.
    pub peak_maintained_entries: u64,
}

impl UsageStats {
    /// Mean byte footprint per recorded state, or zero before any report.
    pub fn mean_allocated_bytes(&self) -> f64 {
        if self.states_recorded == 0 {
            0.0
        } else {
            self.total_allocated_bytes as f64 / self.states_recorded as f64
        }
    }

    /// Mean entry count per recorded state, or zero before any report.
    pub fn mean_maintained_entries(&self) -> f64 {
        if self.states_recorded == 0 {
            0.0
        } else {
            self.total_maintained_entries as f64 / self.states_recorded as f64
        }
    }
}

impl UsageRecorder for UsageStats {
    fn record(&mut self, state_count: u32, allocated_bytes: u64, maintained_entries: u64) {
        self.states_recorded += u64::from(state_count);
        self.total_allocated_bytes += allocated_bytes;
        self.total_maintained_entries += maintained_entries;
        self.peak_allocated_bytes = self.peak_allocated_bytes.max(allocated_bytes);
        self.peak_maintained_entries = self.peak_maintained_entries.max(maintained_entries);
    }
}

/// Shared handle to a [`UsageStats`] accumulator.
///
/// The analysis is single-threaded, so a `Rc<RefCell<..>>` is all the
/// sharing this needs: hand a clone to the policy, keep one, and snapshot
/// whenever a report is due.
#[derive(Clone, Debug, Default)]
pub struct SharedUsageStats(Rc<RefCell<UsageStats>>);

impl SharedUsageStats {
    /// Creates a fresh shared accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the accumulated statistics.
    pub fn snapshot(&self) -> UsageStats {
        self.0.borrow().clone()
    }
}

impl UsageRecorder for SharedUsageStats {
    fn record(&mut self, state_count: u32, allocated_bytes: u64, maintained_entries: u64) {
        self.0
            .borrow_mut()
            .record(state_count, allocated_bytes, maintained_entries);
    }
}
