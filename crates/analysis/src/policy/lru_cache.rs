//! Fully-Associative LRU Cache Policy.
//!
//! Models a cache with `capacity` slots and true LRU recency: `recency` is an
//! abstract age in slots, 0 meaning most recently used. A miss ages every
//! entry by one slot and evicts whatever reaches the capacity; a hit re-ages
//! only the entries that could have been younger than the hit block, with an
//! asymmetric boundary between the two sets:
//!
//! - MUST ages entries strictly younger than the hit (`recency < old`): the
//!   hit could have sat anywhere at or before its documented age, so only
//!   entries provably in front of it are pushed back.
//! - MAY ages entries at or in front of the hit (`recency <= old`): the
//!   optimistic boundary is inclusive.
//!
//! That `<` versus `<=` is what keeps MUST an under-approximation and MAY an
//! over-approximation under recency updates.

use super::{ReplacementPolicy, join_may_youngest, join_must_oldest};
use crate::common::addr::BlockAddr;
use crate::common::error::AnalysisError;
use crate::config::CacheParams;
use crate::state::{self, AbstractMemoryState, MemoryEntry};
use crate::stats::UsageRecorder;

/// Which aging boundary a set transformation uses on a hit.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AgeBoundary {
    /// Age entries with `recency < old` (MUST set).
    Exclusive,
    /// Age entries with `recency <= old` (MAY set).
    Inclusive,
}

/// LRU cache policy state.
pub struct LruCachePolicy {
    capacity: u32,
    line_size_bytes: u32,
    recorder: Option<Box<dyn UsageRecorder>>,
}

impl LruCachePolicy {
    /// Creates an LRU policy from cache geometry.
    ///
    /// The slot count is the line count of the normalized geometry.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for a zero-sized cache; `update`
    /// and `join` are total afterwards.
    pub fn new(params: &CacheParams) -> Result<Self, AnalysisError> {
        let params = params.normalized()?;
        Ok(Self {
            capacity: params.num_lines,
            line_size_bytes: params.line_size_bytes,
            recorder: None,
        })
    }

    /// Attaches a usage recorder told about every produced state.
    pub fn with_recorder(mut self, recorder: Box<dyn UsageRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Transforms one set for an access, hit or miss decided by membership.
    fn touch(
        &self,
        set: &[MemoryEntry],
        address: BlockAddr,
        boundary: AgeBoundary,
    ) -> Vec<MemoryEntry> {
        let mut out = Vec::with_capacity(set.len() + 1);

        match state::recency_of(set, address) {
            // Miss: age everything by one slot, evict at the capacity.
            None => {
                for entry in set {
                    let aged = entry.recency + 1;
                    if aged < self.capacity {
                        out.push(MemoryEntry {
                            address: entry.address,
                            recency: aged,
                        });
                    }
                }
            }
            // Hit: re-age only the entries in front of the hit block.
            Some(old) => {
                for entry in set {
                    if entry.address == address {
                        continue;
                    }
                    let ages = match boundary {
                        AgeBoundary::Exclusive => entry.recency < old,
                        AgeBoundary::Inclusive => entry.recency <= old,
                    };
                    let aged = if ages { entry.recency + 1 } else { entry.recency };
                    // Only reachable in the MAY set, when aging an entry that
                    // shared the hit block's age: its youngest possible age
                    // now exceeds every slot, so it cannot be resident.
                    if aged >= self.capacity {
                        debug_assert!(boundary == AgeBoundary::Inclusive);
                        continue;
                    }
                    out.push(MemoryEntry {
                        address: entry.address,
                        recency: aged,
                    });
                }
            }
        }

        out.push(MemoryEntry {
            address,
            recency: 0,
        });
        state::sort_by_recency(&mut out);
        out
    }

    /// Reports the occupancy of a freshly produced state.
    fn record(&mut self, produced: &AbstractMemoryState) {
        if let Some(recorder) = self.recorder.as_mut() {
            let bytes = produced.may_set.len() as u64 * u64::from(self.line_size_bytes);
            recorder.record(1, bytes, produced.maintained_entries());
        }
    }
}

impl ReplacementPolicy for LruCachePolicy {
    fn blank_state(&self) -> AbstractMemoryState {
        AbstractMemoryState::blank(self.capacity)
    }

    /// Simulates one access with per-set hit/miss outcomes.
    ///
    /// After a join an address can be in MAY but not in MUST; the access is
    /// then a hit for the MAY transformation and a miss for the MUST one, so
    /// each set decides its outcome from its own membership.
    fn update(
        &mut self,
        state: &AbstractMemoryState,
        address: BlockAddr,
    ) -> Result<AbstractMemoryState, AnalysisError> {
        let next = AbstractMemoryState {
            must_set: self.touch(&state.must_set, address, AgeBoundary::Exclusive),
            may_set: self.touch(&state.may_set, address, AgeBoundary::Inclusive),
            capacity: self.capacity,
        };

        debug_assert!(next.must_set.len() <= self.capacity as usize);
        debug_assert!(next.may_set.len() <= self.capacity as usize);
        state::assert_well_formed(&next);
        self.record(&next);
        Ok(next)
    }

    /// Folds predecessor states pairwise, left to right.
    ///
    /// MUST intersects by address at the older age, MAY unions by address at
    /// the younger age.
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
            result = AbstractMemoryState {
                must_set: join_must_oldest(&result.must_set, &other.must_set),
                may_set: join_may_youngest(&result.may_set, &other.may_set),
                capacity: self.capacity,
            };
        }

        state::assert_well_formed(&result);
        self.record(&result);
        Ok(result)
    }
}

impl std::fmt::Debug for LruCachePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCachePolicy")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
