//! # Domain Invariants
//!
//! Consistency checks over a committed [`MintState`] and its
//! [`AllocationBook`]. Every committed transaction must leave all of them
//! holding; the service asserts this in debug builds after each commit.
//!
//! | Invariant | Check |
//! |-----------|-------|
//! | Tier bounds | `allocated(t) <= capacity(t)` for every tier |
//! | Global cap | `Σ allocated <= Σ capacity` |
//! | Contiguous ids | `records[i].id == i + 1`, `next_id == len + 1` |
//! | Tier counters | records per tier == `allocated(t)` |
//! | Quota usage | usage(a) == non-privileged records allocated to `a` |
//! | Allow-list flag | eligible ⇔ remaining > 0 |

use std::collections::HashMap;

use crate::domain::state::{AllocationBook, MintState};
use crate::domain::value_objects::{Address, Tier};

/// No tier allocated beyond its capacity.
#[must_use]
pub fn check_tier_bounds_invariant(state: &MintState) -> Vec<Tier> {
    Tier::ALL
        .into_iter()
        .filter(|&tier| state.registry().allocated(tier) > state.registry().capacity(tier))
        .collect()
}

/// Total allocated within the global cap.
#[must_use]
pub fn check_global_cap_invariant(state: &MintState) -> bool {
    state.registry().total_allocated() <= state.registry().total_capacity()
}

/// Ids are `1..=n` with no gaps, and the id counter points just past them.
#[must_use]
pub fn check_contiguous_ids_invariant(state: &MintState, book: &AllocationBook) -> bool {
    let ids_in_order = book
        .records()
        .iter()
        .zip(1u64..)
        .all(|(record, expected)| record.id.get() == expected);
    let len = book.len() as u64;
    ids_in_order
        && state.next_id().get() == len + 1
        && state.registry().total_allocated() == len
}

/// Records per tier match the registry counters.
#[must_use]
pub fn check_tier_counter_invariant(state: &MintState, book: &AllocationBook) -> bool {
    let mut counts = [0u64; Tier::COUNT];
    for record in book.records() {
        counts[record.tier.index()] += 1;
    }
    Tier::ALL
        .into_iter()
        .all(|tier| counts[tier.index()] == state.registry().allocated(tier))
}

/// Requesters whose recorded usage disagrees with their quota-counted records.
#[must_use]
pub fn check_quota_usage_invariant(state: &MintState, book: &AllocationBook) -> Vec<Address> {
    let mut expected: HashMap<Address, u64> = HashMap::new();
    for record in book.records() {
        if record.path.counts_toward_quota() {
            *expected.entry(record.minted_to).or_default() += 1;
        }
    }

    let mut mismatched: Vec<Address> = state
        .quota()
        .iter()
        .filter(|(addr, used)| expected.get(*addr).copied().unwrap_or(0) != **used)
        .map(|(addr, _)| *addr)
        .collect();
    mismatched.extend(
        expected
            .keys()
            .filter(|addr| state.usage(addr) == 0)
            .copied(),
    );
    mismatched
}

/// Addresses whose eligibility flag disagrees with their remaining count.
#[must_use]
pub fn check_allow_list_flag_invariant(state: &MintState) -> Vec<Address> {
    state
        .allow_list()
        .iter()
        .filter(|(_, grant)| grant.eligible() != (grant.remaining() > 0))
        .map(|(addr, _)| *addr)
        .collect()
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &MintState, book: &AllocationBook) -> InvariantCheckResult {
    let mut violations = Vec::new();

    for tier in check_tier_bounds_invariant(state) {
        violations.push(InvariantViolation::TierOverAllocated {
            tier,
            allocated: state.registry().allocated(tier),
            capacity: state.registry().capacity(tier),
        });
    }

    if !check_global_cap_invariant(state) {
        violations.push(InvariantViolation::GlobalCapExceeded {
            allocated: state.registry().total_allocated(),
            cap: state.registry().total_capacity(),
        });
    }

    if !check_contiguous_ids_invariant(state, book) {
        violations.push(InvariantViolation::NonContiguousIds {
            records: book.len(),
            next_id: state.next_id().get(),
        });
    }

    if !check_tier_counter_invariant(state, book) {
        violations.push(InvariantViolation::TierCounterMismatch);
    }

    for requester in check_quota_usage_invariant(state, book) {
        violations.push(InvariantViolation::QuotaUsageMismatch { requester });
    }

    for user in check_allow_list_flag_invariant(state) {
        violations.push(InvariantViolation::AllowListFlagMismatch { user });
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A tier allocated beyond its capacity.
    TierOverAllocated {
        tier: Tier,
        allocated: u64,
        capacity: u64,
    },
    /// Total allocated beyond the sum of capacities.
    GlobalCapExceeded { allocated: u64, cap: u64 },
    /// Allocation ids have a gap or the counter drifted.
    NonContiguousIds { records: usize, next_id: u64 },
    /// Per-tier record counts differ from the registry.
    TierCounterMismatch,
    /// Quota usage differs from counted records.
    QuotaUsageMismatch { requester: Address },
    /// Eligibility flag set with nothing remaining, or the reverse.
    AllowListFlagMismatch { user: Address },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TierOverAllocated {
                tier,
                allocated,
                capacity,
            } => write!(f, "tier {tier} over-allocated: {allocated} > {capacity}"),
            Self::GlobalCapExceeded { allocated, cap } => {
                write!(f, "global cap exceeded: {allocated} > {cap}")
            }
            Self::NonContiguousIds { records, next_id } => {
                write!(f, "non-contiguous ids: {records} records, next id {next_id}")
            }
            Self::TierCounterMismatch => write!(f, "tier counters disagree with records"),
            Self::QuotaUsageMismatch { requester } => {
                write!(f, "quota usage of {requester} disagrees with records")
            }
            Self::AllowListFlagMismatch { user } => {
                write!(f, "allow-list flag of {user} disagrees with remaining units")
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
