//! Block and function address type.
//!
//! This module defines a strong type for the addresses the analysis tracks so
//! that raw offsets, slot indices, and byte ages cannot be mixed up with
//! addresses at compile time. A `BlockAddr` identifies a cache-line-aligned
//! fetch block for the fixed-size policies and a function entry point for the
//! scratchpad policy.

use std::fmt;

/// An instruction-memory block address on the 32-bit analyzed target.
///
/// For cache policies this is the line-aligned address of a fetch block; for
/// the scratchpad policy it is the entry address of a whole function. The
/// analysis never dereferences it, it is an opaque identity plus the slot
/// arithmetic of the direct-mapped policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockAddr(pub u32);

impl BlockAddr {
    /// Creates a new block address from a raw 32-bit value.
    ///
    /// # Arguments
    ///
    /// * `addr` - The raw 32-bit address value.
    ///
    /// # Returns
    ///
    /// A new `BlockAddr` instance wrapping the provided address.
    #[inline(always)]
    pub const fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockAddr {
    /// Formats the address as a zero-padded hexadecimal literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for BlockAddr {
    fn from(addr: u32) -> Self {
        Self(addr)
    }
}
