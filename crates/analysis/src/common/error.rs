//! Analysis error definitions.
//!
//! This module defines the fatal conditions of the memory-state analysis. It
//! distinguishes:
//! 1. **Configuration errors:** Malformed memory geometry or policy selection,
//!    raised at construction time, never during `update`/`join`.
//! 2. **Unknown-entity errors:** A function address with no registered size,
//!    which signals an inconsistency between the CFG and the function table.
//! 3. **Outsized-entity errors:** A function larger than the whole scratchpad,
//!    fatal unless the configuration opts into ignoring such functions.
//! 4. **Image errors:** An analyzed ELF binary the symbol reader rejects.
//!
//! Every variant halts the enclosing WCET computation: an unsound or missing
//! bound is worse than no bound, so there is no partial-result recovery.
//! Invariant violations inside the abstract domain itself are programmer
//! errors and assert instead of returning one of these.

use thiserror::Error;

use super::addr::BlockAddr;

/// Fatal analysis failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The memory or policy configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A size was requested for a function address no table knows about.
    ///
    /// The CFG extraction and the function table are built from the same
    /// image, so this can only happen when they disagree; continuing would
    /// produce an unsound bound.
    #[error("no function found for address {0}")]
    UnknownFunction(BlockAddr),

    /// A function does not fit the scratchpad even when it is empty.
    #[error(
        "function at {address} ({size} bytes) exceeds scratchpad capacity ({capacity} bytes)"
    )]
    OversizedFunction {
        /// Entry address of the offending function.
        address: BlockAddr,
        /// Footprint of the function, rounded up to block granularity.
        size: u32,
        /// Total scratchpad capacity in bytes.
        capacity: u32,
    },

    /// The analyzed image could not be parsed as an ELF binary.
    #[error("failed to read analyzed image: {0}")]
    Image(#[from] object::read::Error),

    /// The configuration document could not be deserialized.
    #[error("malformed configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),
}
