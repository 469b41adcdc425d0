//! Function footprint lookup for the scratchpad policy.
//!
//! The variable-size policy reasons about byte intervals, so it needs the
//! memory footprint of every function the CFG can activate. This module
//! provides:
//! 1. **The provider interface:** `FunctionSizeProvider`, consumed only by
//!    the scratchpad policy.
//! 2. **A concrete table:** `FunctionTable`, filled either by explicit
//!    registration or from the symbol table of the analyzed ELF image.
//!
//! Footprints are rounded up to the scratchpad block granularity at
//! registration time, so every size the policy sees is already a whole
//! number of blocks.

use std::collections::BTreeMap;

use object::{Object, ObjectSymbol, SymbolKind};
use tracing::warn;

use crate::common::addr::BlockAddr;
use crate::common::error::AnalysisError;

/// Supplies the scratchpad footprint of a function.
///
/// Implementations must be deterministic: the same address always yields the
/// same size within a run, already rounded up to the configured block
/// granularity.
pub trait FunctionSizeProvider {
    /// Returns the footprint of the function entered at `address`, in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::UnknownFunction`] when no size is registered
    /// for `address`. This aborts the analysis: it indicates the CFG and the
    /// function table disagree about what code exists.
    fn size_of(&self, address: BlockAddr) -> Result<u32, AnalysisError>;
}

/// Ordered table of function entry addresses and rounded footprints.
#[derive(Clone)]
pub struct FunctionTable {
    block_size_bytes: u32,
    sizes: BTreeMap<u32, u32>,
}

impl FunctionTable {
    /// Creates an empty table with the given block granularity.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] when `block_size_bytes` is zero.
    pub fn new(block_size_bytes: u32) -> Result<Self, AnalysisError> {
        if block_size_bytes == 0 {
            return Err(AnalysisError::Config(
                "function table block granularity is zero".into(),
            ));
        }
        Ok(Self {
            block_size_bytes,
            sizes: BTreeMap::new(),
        })
    }

    /// Registers a function, rounding its size up to block granularity.
    ///
    /// A zero-byte function still occupies one block; the scratchpad cannot
    /// map less. Re-registering an address overwrites the previous size.
    pub fn register(&mut self, address: BlockAddr, size_bytes: u32) {
        let rounded = size_bytes.max(1).div_ceil(self.block_size_bytes) * self.block_size_bytes;
        let _ = self.sizes.insert(address.val(), rounded);
    }

    /// Returns the number of registered functions.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` when no function has been registered.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Builds a table from the symbol table of the analyzed ELF image.
    ///
    /// Every function symbol with a non-zero size is registered. Symbols
    /// whose address or size does not fit the 32-bit target address space are
    /// skipped with a warning; they cannot be activated by a well-formed CFG
    /// of the supported targets.
    ///
    /// # Arguments
    ///
    /// * `image` - Raw bytes of the analyzed ELF binary.
    /// * `block_size_bytes` - Scratchpad allocation granularity.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Image`] when the bytes are not a readable ELF
    /// file, or [`AnalysisError::Config`] for a zero block granularity.
    pub fn from_elf(image: &[u8], block_size_bytes: u32) -> Result<Self, AnalysisError> {
        let file = object::File::parse(image)?;
        let mut table = Self::new(block_size_bytes)?;

        for symbol in file.symbols() {
            if symbol.kind() != SymbolKind::Text || symbol.size() == 0 {
                continue;
            }
            let (Ok(address), Ok(size)) = (
                u32::try_from(symbol.address()),
                u32::try_from(symbol.size()),
            ) else {
                warn!(
                    address = symbol.address(),
                    size = symbol.size(),
                    "skipping function symbol outside the 32-bit target address space"
                );
                continue;
            };
            table.register(BlockAddr::new(address), size);
        }

        Ok(table)
    }
}

impl FunctionSizeProvider for FunctionTable {
    fn size_of(&self, address: BlockAddr) -> Result<u32, AnalysisError> {
        self.sizes
            .get(&address.val())
            .copied()
            .ok_or(AnalysisError::UnknownFunction(address))
    }
}

impl std::fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionTable")
            .field("block_size_bytes", &self.block_size_bytes)
            .field("functions", &self.sizes.len())
            .finish()
    }
}
