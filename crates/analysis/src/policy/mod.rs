//! Replacement policy implementations.
//!
//! Implements the abstract transformers for the supported instruction
//! memories. Each policy knows how a single access reshapes a state
//! (`update`) and how the states of several predecessor paths combine at a
//! control-flow merge (`join`).
//!
//! # Policies
//!
//! - `DirectMapped`: fixed-size lines, positional (non-recency) eviction.
//! - `LruCache`: fixed-size lines, true LRU over a bounded slot count.
//! - `LruDisp`: variable-size entries (whole functions), LRU by byte offset
//!   over a bounded byte budget.

/// Direct-mapped cache policy.
pub mod direct_mapped;

/// Fully-associative LRU cache policy.
pub mod lru_cache;

/// Variable-size-entry scratchpad policy.
pub mod lru_disp;

pub use direct_mapped::DirectMappedPolicy;
pub use lru_cache::LruCachePolicy;
pub use lru_disp::LruDispPolicy;

use crate::common::addr::BlockAddr;
use crate::common::error::AnalysisError;
use crate::config::{AnalysisConfig, MemoryKind};
use crate::sizes::FunctionSizeProvider;
use crate::state::{self, AbstractMemoryState, MemoryEntry};
use crate::stats::UsageRecorder;

/// Trait for abstract replacement policies.
///
/// A policy is a pair of sound transformers over [`AbstractMemoryState`]:
/// `update` simulates one access on a single path, `join` folds the states
/// of two or more predecessor paths into one conservative state. Neither
/// retains references to its inputs; every call returns a freshly built
/// state. The `&mut self` receiver exists only so the policy can drive its
/// usage recorder; the state transformation itself is pure.
pub trait ReplacementPolicy {
    /// Returns the blank state for program or function entry.
    fn blank_state(&self) -> AbstractMemoryState;

    /// Simulates one access to `address` on top of `state`.
    ///
    /// # Errors
    ///
    /// Only the scratchpad policy can fail here (unknown or oversized
    /// function); the cache policies are total.
    fn update(
        &mut self,
        state: &AbstractMemoryState,
        address: BlockAddr,
    ) -> Result<AbstractMemoryState, AnalysisError>;

    /// Combines predecessor states at a control-flow merge point.
    ///
    /// More than two states fold pairwise, left to right, with an explicit
    /// loop; an empty slice yields the blank state.
    ///
    /// # Errors
    ///
    /// Propagates the same failures as [`ReplacementPolicy::update`].
    fn join(
        &mut self,
        states: &[AbstractMemoryState],
    ) -> Result<AbstractMemoryState, AnalysisError>;

    /// Folds `update` left-to-right over an ordered access sequence.
    ///
    /// Equivalent to calling [`ReplacementPolicy::update`] once per address;
    /// the walker uses this for whole basic blocks.
    ///
    /// # Errors
    ///
    /// Propagates the first `update` failure.
    fn update_many(
        &mut self,
        state: &AbstractMemoryState,
        addresses: &[BlockAddr],
    ) -> Result<AbstractMemoryState, AnalysisError> {
        let mut current = state.clone();
        for &address in addresses {
            current = self.update(&current, address)?;
        }
        Ok(current)
    }
}

/// Builds the policy selected by `config`.
///
/// Dispatches on [`MemoryKind`]: the cache policies are built from
/// `config.cache`, the scratchpad policy from `config.disp` plus a size
/// provider. The recorder, when given, is told the occupancy of every state
/// the policy produces.
///
/// # Errors
///
/// Returns [`AnalysisError::Config`] for unusable geometry or when the
/// scratchpad is selected without a size provider.
pub fn from_config(
    config: &AnalysisConfig,
    sizes: Option<Box<dyn FunctionSizeProvider>>,
    recorder: Option<Box<dyn UsageRecorder>>,
) -> Result<Box<dyn ReplacementPolicy>, AnalysisError> {
    match config.memory {
        MemoryKind::DirectMapped => {
            let mut policy = DirectMappedPolicy::new(&config.cache)?;
            if let Some(recorder) = recorder {
                policy = policy.with_recorder(recorder);
            }
            Ok(Box::new(policy))
        }
        MemoryKind::LruCache => {
            let mut policy = LruCachePolicy::new(&config.cache)?;
            if let Some(recorder) = recorder {
                policy = policy.with_recorder(recorder);
            }
            Ok(Box::new(policy))
        }
        MemoryKind::LruDisp => {
            let sizes = sizes.ok_or_else(|| {
                AnalysisError::Config(
                    "scratchpad analysis selected without a function size provider".into(),
                )
            })?;
            let mut policy = LruDispPolicy::new(&config.disp, sizes)?;
            if let Some(recorder) = recorder {
                policy = policy.with_recorder(recorder);
            }
            Ok(Box::new(policy))
        }
    }
}

/// Intersects two MUST sets, keeping the older (larger) recency per address.
///
/// A must-hit has to be guaranteed regardless of the path taken, so the
/// pessimistic age wins; addresses present on only one side are dropped.
/// Shared by both LRU policies (slot and byte recencies combine the same
/// way).
pub(crate) fn join_must_oldest(a: &[MemoryEntry], b: &[MemoryEntry]) -> Vec<MemoryEntry> {
    let mut combined = Vec::with_capacity(a.len().min(b.len()));
    for entry in a {
        if let Some(other) = state::recency_of(b, entry.address) {
            combined.push(MemoryEntry {
                address: entry.address,
                recency: entry.recency.max(other),
            });
        }
    }
    state::sort_by_recency(&mut combined);
    combined
}

/// Unions two MAY sets, keeping the younger (smaller) recency per address.
///
/// A may-hit only needs one path to make it plausible, so the optimistic age
/// wins among the sides where the address appears.
pub(crate) fn join_may_youngest(a: &[MemoryEntry], b: &[MemoryEntry]) -> Vec<MemoryEntry> {
    let mut combined = Vec::with_capacity(a.len().max(b.len()));
    for address in state::union_of_addresses(a, b) {
        let recency = match (state::recency_of(a, address), state::recency_of(b, address)) {
            (Some(x), Some(y)) => x.min(y),
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => continue,
        };
        combined.push(MemoryEntry { address, recency });
    }
    state::sort_by_recency(&mut combined);
    combined
}
