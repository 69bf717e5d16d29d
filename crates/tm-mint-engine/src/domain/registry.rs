//! # Tier Registry
//!
//! Per-tier capacity caps and allocation counters.
//!
//! `allocated <= capacity` holds for every tier after every operation;
//! `reserve` is the only mutator of `allocated`.

use crate::domain::entities::TierStatus;
use crate::domain::value_objects::Tier;
use crate::errors::MintError;
use serde::{Deserialize, Serialize};

/// Capacity bookkeeping for one tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSlot {
    capacity: u64,
    allocated: u64,
    descriptor: String,
}

impl TierSlot {
    fn new(capacity: u64) -> Self {
        Self {
            capacity,
            allocated: 0,
            descriptor: String::new(),
        }
    }

    /// `capacity - allocated`.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.capacity - self.allocated
    }
}

/// The three tiers and their counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRegistry {
    slots: [TierSlot; Tier::COUNT],
}

impl TierRegistry {
    /// Creates a registry with the given capacities, indexed by tier id.
    ///
    /// # Errors
    /// - `ZeroCapacity` if any capacity is zero
    /// - `Overflow` if the capacities do not sum within `u64`
    pub fn new(capacities: [u64; Tier::COUNT]) -> Result<Self, MintError> {
        let mut total: u64 = 0;
        for tier in Tier::ALL {
            let capacity = capacities[tier.index()];
            if capacity == 0 {
                return Err(MintError::ZeroCapacity(tier));
            }
            total = total.checked_add(capacity).ok_or(MintError::Overflow)?;
        }

        Ok(Self {
            slots: capacities.map(TierSlot::new),
        })
    }

    fn slot(&self, tier: Tier) -> &TierSlot {
        &self.slots[tier.index()]
    }

    /// Capacity cap of a tier.
    #[must_use]
    pub fn capacity(&self, tier: Tier) -> u64 {
        self.slot(tier).capacity
    }

    /// Units allocated from a tier.
    #[must_use]
    pub fn allocated(&self, tier: Tier) -> u64 {
        self.slot(tier).allocated
    }

    /// Remaining capacity of a tier.
    #[must_use]
    pub fn remaining(&self, tier: Tier) -> u64 {
        self.slot(tier).remaining()
    }

    /// Tier metadata URI.
    #[must_use]
    pub fn descriptor(&self, tier: Tier) -> &str {
        &self.slot(tier).descriptor
    }

    /// True iff some tier still has room.
    #[must_use]
    pub fn has_availability(&self) -> bool {
        self.slots.iter().any(|slot| slot.remaining() > 0)
    }

    /// Sum of all capacities (the global cap).
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        self.slots.iter().map(|slot| slot.capacity).sum()
    }

    /// Sum of all allocated counters.
    #[must_use]
    pub fn total_allocated(&self) -> u64 {
        self.slots.iter().map(|slot| slot.allocated).sum()
    }

    /// Sum of all remaining capacities.
    #[must_use]
    pub fn total_remaining(&self) -> u64 {
        self.slots.iter().map(TierSlot::remaining).sum()
    }

    /// Remaining capacity per tier, in walk order.
    #[must_use]
    pub fn remaining_by_tier(&self) -> [u64; Tier::COUNT] {
        [
            self.remaining(Tier::Common),
            self.remaining(Tier::Rare),
            self.remaining(Tier::Legendary),
        ]
    }

    /// Takes one unit from `tier`.
    ///
    /// # Errors
    /// - `TierCapacityExceeded` if the tier is full
    pub fn reserve(&mut self, tier: Tier) -> Result<(), MintError> {
        let slot = &mut self.slots[tier.index()];
        if slot.remaining() == 0 {
            return Err(MintError::TierCapacityExceeded { tier });
        }
        slot.allocated += 1;
        Ok(())
    }

    /// Replaces a tier's metadata URI.
    pub fn set_descriptor(&mut self, tier: Tier, descriptor: String) {
        self.slots[tier.index()].descriptor = descriptor;
    }

    /// Snapshot of one tier.
    #[must_use]
    pub fn status(&self, tier: Tier) -> TierStatus {
        let slot = self.slot(tier);
        TierStatus {
            tier,
            capacity: slot.capacity,
            allocated: slot.allocated,
            remaining: slot.remaining(),
            descriptor: slot.descriptor.clone(),
        }
    }

    /// Snapshot of every tier in walk order.
    #[must_use]
    pub fn statuses(&self) -> Vec<TierStatus> {
        Tier::ALL.iter().map(|tier| self.status(*tier)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TierRegistry {
        TierRegistry::new([3, 2, 1]).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert_eq!(
            TierRegistry::new([10, 0, 1]),
            Err(MintError::ZeroCapacity(Tier::Rare))
        );
    }

    #[test]
    fn test_new_rejects_overflowing_total() {
        assert_eq!(
            TierRegistry::new([u64::MAX, 1, 1]),
            Err(MintError::Overflow)
        );
    }

    #[test]
    fn test_totals() {
        let reg = registry();
        assert_eq!(reg.total_capacity(), 6);
        assert_eq!(reg.total_allocated(), 0);
        assert_eq!(reg.total_remaining(), 6);
        assert_eq!(reg.remaining_by_tier(), [3, 2, 1]);
    }

    #[test]
    fn test_reserve_until_full() {
        let mut reg = registry();
        reg.reserve(Tier::Legendary).unwrap();
        assert_eq!(reg.allocated(Tier::Legendary), 1);
        assert_eq!(reg.remaining(Tier::Legendary), 0);
        assert_eq!(
            reg.reserve(Tier::Legendary),
            Err(MintError::TierCapacityExceeded {
                tier: Tier::Legendary
            })
        );
        // Failed reservation leaves the counter untouched
        assert_eq!(reg.allocated(Tier::Legendary), 1);
    }

    #[test]
    fn test_has_availability() {
        let mut reg = TierRegistry::new([1, 1, 1]).unwrap();
        assert!(reg.has_availability());
        for tier in Tier::ALL {
            reg.reserve(tier).unwrap();
        }
        assert!(!reg.has_availability());
        assert_eq!(reg.total_allocated(), reg.total_capacity());
    }

    #[test]
    fn test_descriptor_and_status() {
        let mut reg = registry();
        reg.set_descriptor(Tier::Rare, "ipfs://rare/".to_string());
        reg.reserve(Tier::Rare).unwrap();

        let status = reg.status(Tier::Rare);
        assert_eq!(status.capacity, 2);
        assert_eq!(status.allocated, 1);
        assert_eq!(status.remaining, 1);
        assert_eq!(status.descriptor, "ipfs://rare/");
        assert_eq!(reg.statuses().len(), Tier::COUNT);
    }
}
