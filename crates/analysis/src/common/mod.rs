//! Common leaf types shared across the analysis.
//!
//! This module gathers the types every other module depends on:
//! 1. **Addresses:** The `BlockAddr` strong type for block and function
//!    addresses on the analyzed target.
//! 2. **Errors:** The `AnalysisError` taxonomy of fatal analysis failures.

/// Block and function address types.
pub mod addr;

/// Analysis error taxonomy.
pub mod error;

pub use addr::BlockAddr;
pub use error::AnalysisError;
