//! Direct-Mapped Cache Policy.
//!
//! Models a cache where the slot of a block is a pure function of its
//! address: `slot = (address >> line_size_bits) % num_lines`. Eviction is
//! positional, not recency-based, so a single-path `update` transforms the
//! MUST and MAY sets identically; the two only diverge through `join`. The
//! `recency` field of every entry stores the computed slot index.

use super::ReplacementPolicy;
use crate::common::addr::BlockAddr;
use crate::common::error::AnalysisError;
use crate::config::CacheParams;
use crate::state::{self, AbstractMemoryState, MemoryEntry};
use crate::stats::UsageRecorder;

/// Direct-mapped policy state.
pub struct DirectMappedPolicy {
    num_lines: u32,
    line_size_bits: u32,
    line_size_bytes: u32,
    recorder: Option<Box<dyn UsageRecorder>>,
}

impl DirectMappedPolicy {
    /// Creates a direct-mapped policy from cache geometry.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for a zero-sized cache or malformed
    /// line geometry; `update` and `join` are total afterwards.
    pub fn new(params: &CacheParams) -> Result<Self, AnalysisError> {
        let params = params.normalized()?;
        Ok(Self {
            num_lines: params.num_lines,
            line_size_bits: params.line_size_bits,
            line_size_bytes: params.line_size_bytes,
            recorder: None,
        })
    }

    /// Attaches a usage recorder told about every produced state.
    pub fn with_recorder(mut self, recorder: Box<dyn UsageRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Computes the slot a block address maps to.
    fn slot(&self, address: BlockAddr) -> u32 {
        (address.val() >> self.line_size_bits) % self.num_lines
    }

    /// Replaces whatever occupies `slot` in `set` with the accessed block.
    fn place(set: &mut Vec<MemoryEntry>, address: BlockAddr, slot: u32) {
        set.retain(|entry| entry.recency != slot);
        set.push(MemoryEntry {
            address,
            recency: slot,
        });
        state::sort_by_recency(set);
    }

    /// Reports the occupancy of a freshly produced state.
    fn record(&mut self, produced: &AbstractMemoryState) {
        if let Some(recorder) = self.recorder.as_mut() {
            let bytes = produced.may_set.len() as u64 * u64::from(self.line_size_bytes);
            recorder.record(1, bytes, produced.maintained_entries());
        }
    }
}

impl ReplacementPolicy for DirectMappedPolicy {
    fn blank_state(&self) -> AbstractMemoryState {
        AbstractMemoryState::blank(self.num_lines)
    }

    /// Installs the accessed block in its slot in both sets.
    ///
    /// Every entry currently at that slot is removed first. On a single path
    /// the cache is deterministic, so MUST and MAY receive the same
    /// transformation.
    fn update(
        &mut self,
        state: &AbstractMemoryState,
        address: BlockAddr,
    ) -> Result<AbstractMemoryState, AnalysisError> {
        let slot = self.slot(address);
        let mut next = state.clone();
        Self::place(&mut next.must_set, address, slot);
        Self::place(&mut next.may_set, address, slot);

        debug_assert!(next.must_set.len() <= self.num_lines as usize);
        self.record(&next);
        Ok(next)
    }

    /// Folds predecessor states pairwise, left to right.
    ///
    /// MUST keeps the addresses present on both sides (the slot is
    /// recomputed from the address, so no ambiguity arises); MAY keeps the
    /// addresses present on either side.
    fn join(
        &mut self,
        states: &[AbstractMemoryState],
    ) -> Result<AbstractMemoryState, AnalysisError> {
        let Some((first, rest)) = states.split_first() else {
            let blank = self.blank_state();
            self.record(&blank);
            return Ok(blank);
        };

        let mut result = first.clone();
        for other in rest {
            let mut must_set = Vec::with_capacity(result.must_set.len());
            for entry in &result.must_set {
                if state::contains(&other.must_set, entry.address) {
                    must_set.push(MemoryEntry {
                        address: entry.address,
                        recency: self.slot(entry.address),
                    });
                }
            }
            state::sort_by_recency(&mut must_set);

            let mut may_set = Vec::new();
            for address in state::union_of_addresses(&result.may_set, &other.may_set) {
                may_set.push(MemoryEntry {
                    address,
                    recency: self.slot(address),
                });
            }
            state::sort_by_recency(&mut may_set);

            result = AbstractMemoryState {
                must_set,
                may_set,
                capacity: self.num_lines,
            };
        }

        state::assert_well_formed(&result);
        self.record(&result);
        Ok(result)
    }
}

impl std::fmt::Debug for DirectMappedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectMappedPolicy")
            .field("num_lines", &self.num_lines)
            .field("line_size_bits", &self.line_size_bits)
            .finish_non_exhaustive()
    }
}
