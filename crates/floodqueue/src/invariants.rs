//! Debug assertion macros for `Ring` and `LevelMachine` invariants.
//!
//! Active only in debug builds (`debug_assert!`), zero overhead in release.

// =============================================================================
// INV-RING-01: Bounded Count
// =============================================================================

/// **Invariant**: `0 <= count <= capacity - 1` (one slot always reserved).
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $capacity > 0 && $count <= $capacity - 1,
            "INV-RING-01 violated: count {} exceeds capacity-1 ({})",
            $count,
            $capacity.saturating_sub(1)
        )
    };
}

// =============================================================================
// INV-RING-02: Head/Tail/Count Consistency
// =============================================================================

/// **Invariant**: `(tail + count) % capacity == head`.
macro_rules! debug_assert_ring_consistent {
    ($tail:expr, $count:expr, $capacity:expr, $head:expr) => {
        debug_assert!(
            ($tail + $count) % $capacity == $head,
            "INV-RING-02 violated: (tail {} + count {}) % capacity {} != head {}",
            $tail,
            $count,
            $capacity,
            $head
        )
    };
}

// =============================================================================
// INV-RING-03: Resize Preserves Live Messages
// =============================================================================

/// **Invariant**: a resize target must be able to hold every live message
/// plus the one reserved slot.
macro_rules! debug_assert_resize_fits {
    ($target:expr, $count:expr) => {
        debug_assert!(
            $target >= $count + 1,
            "INV-RING-03 violated: resize target {} cannot hold {} live messages",
            $target,
            $count
        )
    };
}

// =============================================================================
// INV-LVL-01: Valid State Transition
// =============================================================================

/// **Invariant**: only the documented `LevelState` transitions occur.
macro_rules! debug_assert_valid_transition {
    ($valid:expr, $from:expr, $to:expr) => {
        debug_assert!(
            $valid,
            "INV-LVL-01 violated: unexpected transition {:?} -> {:?}",
            $from,
            $to
        )
    };
}

// =============================================================================
// INV-LVL-02: full_since Set Only While In Full
// =============================================================================

/// **Invariant**: `full_since` is `Some` if and only if the current state is `Full`.
macro_rules! debug_assert_full_since_consistent {
    ($state:expr, $full_since:expr) => {
        debug_assert!(
            matches!($state, crate::level::LevelState::Full) == $full_since.is_some(),
            "INV-LVL-02 violated: state {:?} but full_since {:?}",
            $state,
            $full_since
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_full_since_consistent;
pub(crate) use debug_assert_resize_fits;
pub(crate) use debug_assert_ring_consistent;
pub(crate) use debug_assert_valid_transition;
