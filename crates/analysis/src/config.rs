//! Configuration system for the memory-state analysis.
//!
//! This module defines the configuration structures and enums that
//! parameterize the analysis. It provides:
//! 1. **Defaults:** Baseline instruction-memory geometry constants.
//! 2. **Structures:** Parameters for the fixed-size cache policies and the
//!    variable-size scratchpad policy, plus the root `AnalysisConfig`.
//! 3. **Enums:** The instruction-memory kind selecting the replacement policy.
//!
//! Configuration is supplied as JSON by the enclosing WCET estimator (use
//! [`AnalysisConfig::from_json`]) or built in code with `Default` and the
//! constructors. Geometry is checked once, at construction of a policy, and
//! never again during `update`/`join`.

use serde::Deserialize;

use crate::common::error::AnalysisError;

/// Default configuration constants for the analysis.
///
/// These values define the baseline instruction-memory geometry when not
/// explicitly overridden by the enclosing estimator.
mod defaults {
    /// Default cache capacity in bytes (16 KiB).
    pub const CACHE_CAPACITY_BYTES: u32 = 16 * 1024;

    /// Default cache line size in bytes (32 bytes).
    ///
    /// Matches the fetch granularity of the embedded targets the estimator
    /// supports; line sizes must be a power of two.
    pub const CACHE_LINE_BYTES: u32 = 32;

    /// Default scratchpad capacity in bytes (16 KiB).
    pub const DISP_CAPACITY_BYTES: u32 = 16 * 1024;

    /// Default scratchpad block granularity in bytes (64 bytes).
    ///
    /// Function footprints are rounded up to this granularity before any
    /// occupancy reasoning.
    pub const DISP_BLOCK_BYTES: u32 = 64;
}

/// Instruction-memory kinds selecting the replacement policy.
///
/// The analysis models exactly one on-chip instruction memory per run; this
/// enum picks which abstract policy simulates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryKind {
    /// Fully-associative instruction cache with true LRU replacement.
    #[default]
    #[serde(alias = "LRU")]
    LruCache,
    /// Direct-mapped instruction cache; the slot of a block is a pure
    /// function of its address.
    DirectMapped,
    /// Dynamic instruction scratchpad holding whole functions of differing
    /// sizes under LRU-by-byte-offset replacement.
    #[serde(alias = "DISP")]
    LruDisp,
}

/// Geometry of a fixed-size-entry instruction cache.
///
/// `line_size_bits` and `num_lines` are derived from the capacity and line
/// size; they may be left at zero in a configuration document and filled in
/// by [`CacheParams::normalized`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheParams {
    /// Total cache capacity in bytes.
    #[serde(default = "CacheParams::default_capacity")]
    pub capacity_bytes: u32,

    /// Cache line size in bytes; must be a power of two.
    #[serde(default = "CacheParams::default_line")]
    pub line_size_bytes: u32,

    /// log2 of the line size; zero means "derive from `line_size_bytes`".
    #[serde(default)]
    pub line_size_bits: u32,

    /// Number of lines; zero means "derive from capacity and line size".
    #[serde(default)]
    pub num_lines: u32,
}

impl CacheParams {
    /// Returns the default cache capacity in bytes.
    fn default_capacity() -> u32 {
        defaults::CACHE_CAPACITY_BYTES
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> u32 {
        defaults::CACHE_LINE_BYTES
    }

    /// Builds cache parameters from capacity and line size alone.
    ///
    /// # Arguments
    ///
    /// * `capacity_bytes` - Total cache capacity in bytes.
    /// * `line_size_bytes` - Line size in bytes; must be a power of two that
    ///   divides the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] for a zero-sized cache, a line size
    /// that is not a power of two, or a capacity the line size does not
    /// divide.
    pub fn with_geometry(capacity_bytes: u32, line_size_bytes: u32) -> Result<Self, AnalysisError> {
        let params = Self {
            capacity_bytes,
            line_size_bytes,
            line_size_bits: 0,
            num_lines: 0,
        };
        params.normalized()
    }

    /// Fills derived fields and checks the geometry for consistency.
    ///
    /// A zero `line_size_bits` or `num_lines` is replaced by the value
    /// derived from capacity and line size; non-zero fields must agree with
    /// the derived values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] when any dimension is zero, the line
    /// size is not a power of two, the line size does not divide the
    /// capacity, or an explicitly given derived field disagrees.
    pub fn normalized(&self) -> Result<Self, AnalysisError> {
        if self.capacity_bytes == 0 {
            return Err(AnalysisError::Config("cache capacity is zero".into()));
        }
        if self.line_size_bytes == 0 {
            return Err(AnalysisError::Config("cache line size is zero".into()));
        }
        if !self.line_size_bytes.is_power_of_two() {
            return Err(AnalysisError::Config(format!(
                "cache line size {} is not a power of two",
                self.line_size_bytes
            )));
        }
        if self.capacity_bytes % self.line_size_bytes != 0 {
            return Err(AnalysisError::Config(format!(
                "cache line size {} does not divide capacity {}",
                self.line_size_bytes, self.capacity_bytes
            )));
        }

        let derived_bits = self.line_size_bytes.trailing_zeros();
        let derived_lines = self.capacity_bytes / self.line_size_bytes;

        if self.line_size_bits != 0 && self.line_size_bits != derived_bits {
            return Err(AnalysisError::Config(format!(
                "line_size_bits {} disagrees with line size {}",
                self.line_size_bits, self.line_size_bytes
            )));
        }
        if self.num_lines != 0 && self.num_lines != derived_lines {
            return Err(AnalysisError::Config(format!(
                "num_lines {} disagrees with capacity {} / line size {}",
                self.num_lines, self.capacity_bytes, self.line_size_bytes
            )));
        }

        Ok(Self {
            capacity_bytes: self.capacity_bytes,
            line_size_bytes: self.line_size_bytes,
            line_size_bits: derived_bits,
            num_lines: derived_lines,
        })
    }
}

impl Default for CacheParams {
    /// Creates the default cache geometry (16 KiB, 32-byte lines).
    fn default() -> Self {
        Self {
            capacity_bytes: defaults::CACHE_CAPACITY_BYTES,
            line_size_bytes: defaults::CACHE_LINE_BYTES,
            line_size_bits: defaults::CACHE_LINE_BYTES.trailing_zeros(),
            num_lines: defaults::CACHE_CAPACITY_BYTES / defaults::CACHE_LINE_BYTES,
        }
    }
}

/// Geometry and options of the dynamic instruction scratchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DispParams {
    /// Total scratchpad capacity in bytes.
    #[serde(default = "DispParams::default_capacity")]
    pub capacity_bytes: u32,

    /// Allocation granularity in bytes; function footprints round up to it.
    #[serde(default = "DispParams::default_block")]
    pub block_size_bytes: u32,

    /// When set, a function larger than the whole scratchpad is left
    /// unmapped (it classifies as a miss downstream) instead of aborting the
    /// analysis.
    #[serde(default)]
    pub ignore_outsized_functions: bool,
}

impl DispParams {
    /// Returns the default scratchpad capacity in bytes.
    fn default_capacity() -> u32 {
        defaults::DISP_CAPACITY_BYTES
    }

    /// Returns the default scratchpad block granularity in bytes.
    fn default_block() -> u32 {
        defaults::DISP_BLOCK_BYTES
    }

    /// Checks the scratchpad geometry.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] when the capacity or the block
    /// granularity is zero.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.capacity_bytes == 0 {
            return Err(AnalysisError::Config("scratchpad capacity is zero".into()));
        }
        if self.block_size_bytes == 0 {
            return Err(AnalysisError::Config(
                "scratchpad block granularity is zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for DispParams {
    /// Creates the default scratchpad geometry (16 KiB, 64-byte blocks).
    fn default() -> Self {
        Self {
            capacity_bytes: defaults::DISP_CAPACITY_BYTES,
            block_size_bytes: defaults::DISP_BLOCK_BYTES,
            ignore_outsized_functions: false,
        }
    }
}

/// Root configuration for one analysis run.
///
/// The enclosing estimator hands the analysis its parameters as a JSON
/// document; only the section selected by `memory` is consulted.
///
/// # Examples
///
/// ```
/// use tacet_core::config::{AnalysisConfig, MemoryKind};
///
/// let json = r#"{
///     "memory": "DISP",
///     "disp": {
///         "capacity_bytes": 4096,
///         "block_size_bytes": 8,
///         "ignore_outsized_functions": true
///     }
/// }"#;
///
/// let config = AnalysisConfig::from_json(json).unwrap();
/// assert_eq!(config.memory, MemoryKind::LruDisp);
/// assert_eq!(config.disp.capacity_bytes, 4096);
/// assert!(config.disp.ignore_outsized_functions);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    /// Which instruction memory (and thus which policy) is modeled.
    #[serde(default)]
    pub memory: MemoryKind,

    /// Cache geometry, used by the direct-mapped and LRU cache policies.
    #[serde(default)]
    pub cache: CacheParams,

    /// Scratchpad geometry, used by the variable-size policy.
    #[serde(default)]
    pub disp: DispParams,
}

impl AnalysisConfig {
    /// Deserializes a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::ConfigFormat`] when the document is not valid
    /// JSON for this schema. Geometry is validated later, when a policy is
    /// constructed from the selected section.
    pub fn from_json(document: &str) -> Result<Self, AnalysisError> {
        Ok(serde_json::from_str(document)?)
    }
}
