//! Shared fixtures for the analysis test suite.
//!
//! States are built through the public policy API wherever possible; the raw
//! constructors here exist for the few tests that need a hand-crafted state
//! (for example to exercise an invariant guard).

use tacet_core::common::BlockAddr;
use tacet_core::config::CacheParams;
use tacet_core::policy::{DirectMappedPolicy, LruCachePolicy, LruDispPolicy};
use tacet_core::sizes::FunctionTable;
use tacet_core::state::{AbstractMemoryState, MemoryEntry};

/// Distinct block ids used by the cache tests, one per letter of the
/// classic LRU walkthrough.
pub const A: u32 = 0x0100;
/// Second block id.
pub const B: u32 = 0x0200;
/// Third block id.
pub const C: u32 = 0x0300;
/// Fourth block id.
pub const D: u32 = 0x0400;
/// Fifth block id, the one that forces an eviction at capacity four.
pub const E: u32 = 0x0500;

/// Builds a `MemoryEntry` from raw parts.
pub fn entry(address: u32, recency: u32) -> MemoryEntry {
    MemoryEntry {
        address: BlockAddr::new(address),
        recency,
    }
}

/// Builds a state from raw entry lists; used only for guard tests.
pub fn raw_state(must: &[(u32, u32)], may: &[(u32, u32)], capacity: u32) -> AbstractMemoryState {
    AbstractMemoryState {
        must_set: must.iter().map(|&(a, r)| entry(a, r)).collect(),
        may_set: may.iter().map(|&(a, r)| entry(a, r)).collect(),
        capacity,
    }
}

/// Addresses of a set, sorted for order-insensitive comparison.
pub fn addresses_of(set: &[MemoryEntry]) -> Vec<u32> {
    let mut addresses: Vec<u32> = set.iter().map(|e| e.address.val()).collect();
    addresses.sort_unstable();
    addresses
}

/// Recency of `address` in `set`, or a panic message naming the test hole.
pub fn age_of(set: &[MemoryEntry], address: u32) -> u32 {
    tacet_core::state::recency_of(set, BlockAddr::new(address))
        .unwrap_or_else(|| panic!("address {address:#x} not tracked"))
}

/// A fully-associative LRU policy with `slots` slots (32-byte lines).
pub fn lru_policy(slots: u32) -> LruCachePolicy {
    let params = CacheParams::with_geometry(slots * 32, 32).unwrap();
    LruCachePolicy::new(&params).unwrap()
}

/// A direct-mapped policy with eight 32-byte lines.
///
/// `slot(addr) = (addr >> 5) % 8`, so `0x100` and `0x200` collide at slot 0.
pub fn direct_mapped_policy() -> DirectMappedPolicy {
    let params = CacheParams::with_geometry(256, 32).unwrap();
    DirectMappedPolicy::new(&params).unwrap()
}

/// A function table with the given `(address, raw size)` pairs.
pub fn table(block_size_bytes: u32, functions: &[(u32, u32)]) -> FunctionTable {
    let mut table = FunctionTable::new(block_size_bytes).unwrap();
    for &(address, size) in functions {
        table.register(BlockAddr::new(address), size);
    }
    table
}

/// A scratchpad policy over `capacity` bytes with 4-byte blocks.
pub fn disp_policy(capacity: u32, functions: &[(u32, u32)]) -> LruDispPolicy {
    disp_policy_with_flag(capacity, functions, false)
}

/// Same as [`disp_policy`] with an explicit outsized-function flag.
pub fn disp_policy_with_flag(
    capacity: u32,
    functions: &[(u32, u32)],
    ignore_outsized: bool,
) -> LruDispPolicy {
    let params = tacet_core::config::DispParams {
        capacity_bytes: capacity,
        block_size_bytes: 4,
        ignore_outsized_functions: ignore_outsized,
    };
    LruDispPolicy::new(&params, Box::new(table(4, functions))).unwrap()
}

/// Wraps raw ids as block addresses.
pub fn addr(address: u32) -> BlockAddr {
    BlockAddr::new(address)
}
