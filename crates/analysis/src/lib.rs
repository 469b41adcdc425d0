//! Abstract instruction-memory state analysis for static WCET estimation.
//!
//! This crate implements the memory-state engine of a WCET estimator for
//! processors with an on-chip instruction memory. It provides:
//! 1. **Data model:** MUST/MAY abstract states over block and function
//!    addresses, with deterministic ordering.
//! 2. **Policies:** Sound `update`/`join` transformers for a direct-mapped
//!    cache, a fully-associative LRU cache, and a variable-size-entry
//!    instruction scratchpad (DISP).
//! 3. **Collaborator interfaces:** Function footprint lookup (with ELF
//!    symbol-table ingestion) and per-state usage recording.
//! 4. **Classification:** The guaranteed-hit / guaranteed-miss / unknown
//!    verdict the timing stage consumes.
//! 5. **Configuration:** JSON-deserializable geometry with construction-time
//!    validation.
//!
//! The MUST set never claims residency a real execution could fail to
//! provide, and the MAY set never omits residency a real execution could
//! provide; everything else in the estimator builds on that pair of
//! guarantees.

/// Common types (addresses, errors).
pub mod common;
/// Analysis configuration (defaults, enums, parameter structures).
pub mod config;
/// Replacement policies (direct-mapped, LRU cache, scratchpad).
pub mod policy;
/// Function footprint lookup for the scratchpad policy.
pub mod sizes;
/// Abstract memory state, set algebra, and access classification.
pub mod state;
/// Usage accounting for produced states.
pub mod stats;

/// Root configuration type; use `AnalysisConfig::default()` or deserialize
/// from the enclosing estimator's JSON.
pub use crate::config::AnalysisConfig;
/// The capability every replacement policy implements.
pub use crate::policy::ReplacementPolicy;
/// The per-CFG-point analysis result.
pub use crate::state::{AbstractMemoryState, Classification};
/// Strong address type and the fatal error taxonomy.
pub use crate::common::{AnalysisError, BlockAddr};
