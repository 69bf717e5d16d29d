//! # Quota Ledger
//!
//! Per-requester usage against the global per-address cap, and the allow-list
//! grants that entitle specific addresses to free units.
//!
//! Both structures are plain value records; mutations only become visible
//! when the enclosing transaction commits.

use crate::domain::entities::AllowListStatus;
use crate::domain::value_objects::Address;
use crate::errors::MintError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// REQUESTER QUOTA
// =============================================================================

/// Cumulative non-privileged allocations per requester.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaLedger {
    usage: HashMap<Address, u64>,
}

impl QuotaLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Units already allocated to `requester` through quota-bound paths.
    #[must_use]
    pub fn usage(&self, requester: &Address) -> u64 {
        self.usage.get(requester).copied().unwrap_or(0)
    }

    /// Checks that `units` more fit under `cap`.
    ///
    /// # Errors
    /// - `QuotaExceeded` if `usage + units > cap`
    pub fn check(&self, requester: &Address, units: u64, cap: u64) -> Result<(), MintError> {
        let used = self.usage(requester);
        match used.checked_add(units) {
            Some(total) if total <= cap => Ok(()),
            _ => Err(MintError::QuotaExceeded {
                requester: *requester,
                used,
                requested: units,
                cap,
            }),
        }
    }

    /// Adds `units` to the requester's usage.
    ///
    /// # Errors
    /// - `Overflow` if the counter would wrap
    pub fn record(&mut self, requester: Address, units: u64) -> Result<(), MintError> {
        let entry = self.usage.entry(requester).or_insert(0);
        *entry = entry.checked_add(units).ok_or(MintError::Overflow)?;
        Ok(())
    }

    /// Iterates over every requester with non-zero usage.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.usage.iter()
    }
}

// =============================================================================
// ALLOW LIST
// =============================================================================

/// Free-unit allowance of one address.
///
/// `eligible` is cleared as soon as `remaining` reaches zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListGrant {
    eligible: bool,
    remaining: u32,
}

impl AllowListGrant {
    /// Eligibility flag.
    #[must_use]
    pub const fn eligible(&self) -> bool {
        self.eligible
    }

    /// Free units left.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Allow-list grants by address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    grants: HashMap<Address, AllowListGrant>,
}

impl AllowList {
    /// Creates an empty allow list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded grants.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &AllowListGrant)> {
        self.grants.iter()
    }

    /// Grant status of `user` (default: not eligible, nothing remaining).
    #[must_use]
    pub fn status(&self, user: &Address) -> AllowListStatus {
        let grant = self.grants.get(user).copied().unwrap_or_default();
        AllowListStatus {
            eligible: grant.eligible,
            remaining: grant.remaining,
        }
    }

    /// Marks `user` eligible and adds `extra_units` free units.
    ///
    /// Returns the new remaining count.
    ///
    /// # Errors
    /// - `ZeroAddress` if `user` is zero
    /// - `InvalidQuantity` if `extra_units` is zero
    /// - `Overflow` if the counter would wrap
    pub fn grant_or_top_up(&mut self, user: Address, extra_units: u32) -> Result<u32, MintError> {
        if user.is_zero() {
            return Err(MintError::ZeroAddress);
        }
        if extra_units == 0 {
            return Err(MintError::InvalidQuantity {
                requested: 0,
                max: u32::MAX,
            });
        }

        let grant = self.grants.entry(user).or_default();
        let remaining = grant
            .remaining
            .checked_add(extra_units)
            .ok_or(MintError::Overflow)?;
        grant.remaining = remaining;
        grant.eligible = true;
        Ok(remaining)
    }

    /// Clears `user`'s eligibility and remaining units.
    ///
    /// # Errors
    /// - `NotEligible` if `user` has no active grant
    pub fn revoke(&mut self, user: &Address) -> Result<(), MintError> {
        match self.grants.remove(user) {
            Some(grant) if grant.eligible => Ok(()),
            _ => Err(MintError::NotEligible { requester: *user }),
        }
    }

    /// Checks that `requester` may take one free unit, without consuming it.
    ///
    /// # Errors
    /// - `NotEligible` if the flag is clear or nothing remains
    pub fn ensure_eligible(&self, requester: &Address) -> Result<(), MintError> {
        match self.grants.get(requester) {
            Some(grant) if grant.eligible && grant.remaining > 0 => Ok(()),
            _ => Err(MintError::NotEligible {
                requester: *requester,
            }),
        }
    }

    /// Consumes one free unit.
    ///
    /// Returns the units left; the eligibility flag is cleared at zero.
    ///
    /// # Errors
    /// - `NotEligible` if the flag is clear or nothing remains
    pub fn consume_free(&mut self, requester: &Address) -> Result<u32, MintError> {
        self.ensure_eligible(requester)?;
        let grant = self
            .grants
            .get_mut(requester)
            .ok_or(MintError::NotEligible {
                requester: *requester,
            })?;
        grant.remaining -= 1;
        if grant.remaining == 0 {
            grant.eligible = false;
        }
        Ok(grant.remaining)
    }
}

// =============================================================================
// TESTS
// =============================================================================
