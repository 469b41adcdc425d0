//! Variable-Size-Entry Scratchpad Policy (DISP).
//!
//! Models a dynamic instruction scratchpad filled with whole functions of
//! differing byte sizes under LRU-like eviction. `recency` is a byte offset
//! from the top of the LRU stack rather than a discrete slot: an entry of
//! size `s` occupies the abstract interval `[recency, recency + s)`.
//!
//! Unlike a cache, two functions can occupy overlapping *abstract* intervals
//! after a merge of two paths (each path filled the byte budget differently).
//! The hit transform therefore reasons about interval overlap: when a
//! reloaded function's new interval `[0, f_size)` intersects another entry's
//! interval, that entry's age is folded into a single safe position instead
//! of tracking multiple simultaneous layouts.
//!
//! Footprints always come from the [`FunctionSizeProvider`], never from the
//! entries themselves, so they are recomputed rather than stored.

use tracing::warn;

use super::{ReplacementPolicy, join_may_youngest, join_must_oldest};
use crate::common::addr::BlockAddr;
use crate::common::error::AnalysisError;
use crate::config::DispParams;
use crate::sizes::FunctionSizeProvider;
use crate::state::{self, AbstractMemoryState, MemoryEntry};
use crate::stats::UsageRecorder;

/// Which abstract set a transformation is shaping.
///
/// The hit transform needs to know: overlap folding picks the pessimistic
/// age for MUST and the optimistic one for MAY, and eviction-on-overflow
/// after the fold is only legal for MAY.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Analysis {
    Must,
    May,
}

/// Scratchpad policy state.
pub struct LruDispPolicy {
    capacity: u32,
    ignore_outsized: bool,
    sizes: Box<dyn FunctionSizeProvider>,
    recorder: Option<Box<dyn UsageRecorder>>,
}

impl LruDispPolicy {
    /// Creates a scratchpad policy from geometry and a size provider.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for a zero-sized scratchpad or a
    /// zero block granularity.
    pub fn new(
        params: &DispParams,
        sizes: Box<dyn FunctionSizeProvider>,
    ) -> Result<Self, AnalysisError> {
        params.validate()?;
        Ok(Self {
            capacity: params.capacity_bytes,
            ignore_outsized: params.ignore_outsized_functions,
            sizes,
            recorder: None,
        })
    }

    /// Attaches a usage recorder told about every produced state.
    pub fn with_recorder(mut self, recorder: Box<dyn UsageRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Transforms one set for an activation, hit or miss decided by
    /// membership.
    fn touch(
        &self,
        set: &[MemoryEntry],
        address: BlockAddr,
        f_size: u32,
        analysis: Analysis,
    ) -> Result<Vec<MemoryEntry>, AnalysisError> {
        let mut out = Vec::with_capacity(set.len() + 1);

        match state::recency_of(set, address) {
            // Miss: every resident function slides down by the footprint of
            // the loaded one; whatever slides past the budget is evicted.
            None => {
                for entry in set {
                    let entry_size = self.sizes.size_of(entry.address)?;
                    let aged = entry.recency + f_size;
                    if aged + entry_size <= self.capacity {
                        out.push(MemoryEntry {
                            address: entry.address,
                            recency: aged,
                        });
                    }
                }
            }
            // Hit: the activated function returns to the top; every other
            // entry is repositioned relative to the reload.
            Some(f_age) => {
                for entry in set {
                    if entry.address == address {
                        continue;
                    }
                    let g_size = self.sizes.size_of(entry.address)?;
                    let g_age = entry.recency;

                    let aged = if g_age < f_size && 0 < g_age + g_size {
                        // The entry's interval intersects the reloaded
                        // function's new interval [0, f_size): fold the
                        // overlap into a single safe age.
                        match analysis {
                            Analysis::Must => {
                                g_age.max(f_size + f_age.saturating_sub(g_size))
                            }
                            Analysis::May => g_age.min(f_age) + f_size,
                        }
                    } else if g_age < f_age {
                        // In front of the reloaded function's old position:
                        // shifted back by its footprint.
                        g_age + f_size
                    } else {
                        g_age
                    };

                    if aged + g_size > self.capacity {
                        assert!(
                            analysis == Analysis::May,
                            "MUST entry {} pushed past scratchpad capacity by a hit transform",
                            entry.address
                        );
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
        Ok(out)
    }

    /// Byte footprint of the MAY set, for the usage recorder.
    fn occupied_bytes(&self, set: &[MemoryEntry]) -> u64 {
        set.iter()
            .map(|entry| u64::from(self.sizes.size_of(entry.address).unwrap_or(0)))
            .sum()
    }

    /// Reports the occupancy of a freshly produced state.
    fn record(&mut self, produced: &AbstractMemoryState) {
        let bytes = self.occupied_bytes(&produced.may_set);
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(1, bytes, produced.maintained_entries());
        }
    }
}

impl ReplacementPolicy for LruDispPolicy {
    fn blank_state(&self) -> AbstractMemoryState {
        AbstractMemoryState::blank(self.capacity)
    }

    /// Simulates activating the function entered at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownFunction`] when the size provider has
    /// never heard of `address`, and [`AnalysisError::OversizedFunction`]
    /// when the function cannot fit an empty scratchpad and
    /// `ignore_outsized_functions` is off. With the flag on, the oversized
    /// function is left unmapped and the state passes through unchanged.
    fn update(
        &mut self,
        state: &AbstractMemoryState,
        address: BlockAddr,
    ) -> Result<AbstractMemoryState, AnalysisError> {
        let f_size = self.sizes.size_of(address)?;

        if f_size > self.capacity {
            if self.ignore_outsized {
                warn!(
                    address = %address,
                    size = f_size,
                    capacity = self.capacity,
                    "function exceeds scratchpad capacity, leaving it unmapped"
                );
                let next = state.clone();
                self.record(&next);
                return Ok(next);
            }
            return Err(AnalysisError::OversizedFunction {
                address,
                size: f_size,
                capacity: self.capacity,
            });
        }

        let next = AbstractMemoryState {
            must_set: self.touch(&state.must_set, address, f_size, Analysis::Must)?,
            may_set: self.touch(&state.may_set, address, f_size, Analysis::May)?,
            capacity: self.capacity,
        };

        state::assert_well_formed(&next);
        self.record(&next);
        Ok(next)
    }

    /// Folds predecessor states pairwise, left to right.
    ///
    /// The same intersection/union and oldest/youngest selection as the LRU
    /// cache, over byte recencies.
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

impl std::fmt::Debug for LruDispPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruDispPolicy")
            .field("capacity", &self.capacity)
            .field("ignore_outsized", &self.ignore_outsized)
            .finish_non_exhaustive()
    }
}
