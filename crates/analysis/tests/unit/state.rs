//! Abstract State and Set Algebra Tests.
//!
//! Verifies membership, address union, the deterministic recency sort, and
//! the hit/miss/unknown classification the timing stage consumes.

use pretty_assertions::assert_eq;

use tacet_core::state::{
    AbstractMemoryState, Classification, classify, contains, recency_of, sort_by_recency,
    union_of_addresses,
};

use crate::common::{addr, entry, raw_state};

// ══════════════════════════════════════════════════════════
// 1. Membership
// ══════════════════════════════════════════════════════════

/// A blank state tracks nothing.
#[test]
fn blank_state_is_empty() {
    let state = AbstractMemoryState::blank(4);
    assert!(state.must_set.is_empty());
    assert!(state.may_set.is_empty());
    assert_eq!(state.capacity, 4);
    assert_eq!(state.maintained_entries(), 0);
}

/// `contains` and `recency_of` agree on tracked addresses.
#[test]
fn membership_lookup() {
    let set = vec![entry(0x100, 0), entry(0x200, 3)];
    assert!(contains(&set, addr(0x100)));
    assert!(contains(&set, addr(0x200)));
    assert!(!contains(&set, addr(0x300)));
    assert_eq!(recency_of(&set, addr(0x200)), Some(3));
    assert_eq!(recency_of(&set, addr(0x300)), None);
}

// ══════════════════════════════════════════════════════════
// 2. Address union
// ══════════════════════════════════════════════════════════

/// Each address appears exactly once, first-seen order.
#[test]
fn union_deduplicates_in_first_seen_order() {
    let a = vec![entry(0x100, 0), entry(0x200, 1)];
    let b = vec![entry(0x200, 0), entry(0x300, 1)];

    let union = union_of_addresses(&a, &b);
    assert_eq!(union, vec![addr(0x100), addr(0x200), addr(0x300)]);
}

/// Union with an empty side reproduces the other side's addresses.
#[test]
fn union_with_empty_side() {
    let a = vec![entry(0x100, 2), entry(0x200, 5)];
    assert_eq!(union_of_addresses(&a, &[]), vec![addr(0x100), addr(0x200)]);
    assert_eq!(union_of_addresses(&[], &a), vec![addr(0x100), addr(0x200)]);
}

// ══════════════════════════════════════════════════════════
// 3. Recency sort
// ══════════════════════════════════════════════════════════

/// Ascending by recency, ties broken by address.
#[test]
fn sort_orders_by_recency_then_address() {
    let mut set = vec![
        entry(0x300, 2),
        entry(0x200, 0),
        entry(0x400, 2),
        entry(0x100, 1),
    ];
    sort_by_recency(&mut set);
    assert_eq!(
        set,
        vec![
            entry(0x200, 0),
            entry(0x100, 1),
            entry(0x300, 2),
            entry(0x400, 2),
        ]
    );
}

// ══════════════════════════════════════════════════════════
// 4. Classification
// ══════════════════════════════════════════════════════════

/// MUST membership is a guaranteed hit, MAY absence a guaranteed miss,
/// anything else stays unknown.
#[test]
fn classification_follows_the_two_sets() {
    let state = raw_state(&[(0x100, 0)], &[(0x100, 0), (0x200, 1)], 4);

    assert_eq!(classify(&state, addr(0x100)), Classification::Hit);
    assert_eq!(classify(&state, addr(0x200)), Classification::Unknown);
    assert_eq!(classify(&state, addr(0x300)), Classification::Miss);
}

/// Every access against a blank state is a guaranteed miss.
#[test]
fn blank_state_classifies_all_misses() {
    let state = AbstractMemoryState::blank(8);
    assert_eq!(classify(&state, addr(0x100)), Classification::Miss);
}
