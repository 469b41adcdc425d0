//! Function Table Tests.
//!
//! Verifies footprint rounding, unknown-address failure, and the rejection
//! of unreadable analyzed images.

use rstest::rstest;

use tacet_core::common::{AnalysisError, BlockAddr};
use tacet_core::sizes::{FunctionSizeProvider, FunctionTable};

use crate::common::table;

/// Raw sizes round up to whole blocks; zero-byte functions still occupy one.
#[rstest]
#[case(1, 4)]
#[case(4, 4)]
#[case(5, 8)]
#[case(8, 8)]
#[case(0, 4)]
fn sizes_round_up_to_block_granularity(#[case] raw: u32, #[case] rounded: u32) {
    let table = table(4, &[(0x1000, raw)]);
    assert_eq!(table.size_of(BlockAddr::new(0x1000)).unwrap(), rounded);
}

/// Looking up an unregistered address is fatal.
#[test]
fn unknown_address_is_fatal() {
    let table = table(4, &[(0x1000, 8)]);
    let result = table.size_of(BlockAddr::new(0x2000));
    assert!(matches!(
        result,
        Err(AnalysisError::UnknownFunction(a)) if a == BlockAddr::new(0x2000)
    ));
}

/// Re-registering an address overwrites the previous footprint.
#[test]
fn reregistration_overwrites() {
    let mut table = table(4, &[(0x1000, 8)]);
    table.register(BlockAddr::new(0x1000), 17);
    assert_eq!(table.size_of(BlockAddr::new(0x1000)).unwrap(), 20);
    assert_eq!(table.len(), 1);
}

/// A zero block granularity is a construction error.
#[test]
fn zero_granularity_is_rejected() {
    assert!(matches!(
        FunctionTable::new(0),
        Err(AnalysisError::Config(_))
    ));
}

/// Bytes that are not an ELF image are rejected, not misread.
#[test]
fn garbage_image_is_rejected() {
    let result = FunctionTable::from_elf(b"definitely not an elf binary", 8);
    assert!(matches!(result, Err(AnalysisError::Image(_))));
}

/// An empty table reports itself empty.
#[test]
fn empty_table_reports_empty() {
    let table = FunctionTable::new(8).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
}
