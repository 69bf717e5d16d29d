//! # Core Domain Entities
//!
//! Records created by the issuance engine and the snapshots it hands out.

use crate::domain::settlement::Settlement;
use crate::domain::value_objects::{Address, Tier, TokenId, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// MINT PATH
// =============================================================================

/// Entry point that produced an allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MintPath {
    /// Paid public sale.
    Public,
    /// Free allow-list mint.
    AllowList,
    /// Owner mint, exempt from quota and payment.
    Privileged,
}

impl MintPath {
    /// Whether allocations through this path count against the requester quota.
    #[must_use]
    pub const fn counts_toward_quota(self) -> bool {
        !matches!(self, Self::Privileged)
    }

    /// Stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::AllowList => "allow_list",
            Self::Privileged => "privileged",
        }
    }
}

// =============================================================================
// ALLOCATION RECORD
// =============================================================================

/// One allocated unit.
///
/// Created exactly once when the unit is allocated. The tier never changes
/// afterwards; current ownership is tracked by the ledger, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Allocation id.
    pub id: TokenId,
    /// Requester the unit was allocated to.
    pub minted_to: Address,
    /// Tier drawn for this unit.
    pub tier: Tier,
    /// Entry point that allocated it.
    pub path: MintPath,
}

// =============================================================================
// RECEIPTS
// =============================================================================

/// A unit handed out by a successful mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedUnit {
    /// Allocation id.
    pub id: TokenId,
    /// Tier drawn.
    pub tier: Tier,
}

/// Result of a committed mint request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Recipient of every unit in this receipt.
    pub recipient: Address,
    /// Entry point used.
    pub path: MintPath,
    /// Units in allocation order.
    pub units: Vec<AllocatedUnit>,
    /// Amount retained as proceeds (zero for free paths).
    pub cost: U256,
    /// Overpayment returned to the requester.
    pub refund: U256,
}

impl MintReceipt {
    /// Allocation ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<TokenId> {
        self.units.iter().map(|unit| unit.id).collect()
    }

    /// Number of units allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Cost and refund of this request.
    #[must_use]
    pub fn settlement(&self) -> Settlement {
        Settlement {
            cost: self.cost,
            refund: self.refund,
        }
    }

    /// True if no unit was allocated (never the case for a committed receipt).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

/// Read-only view of one tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStatus {
    /// Tier.
    pub tier: Tier,
    /// Capacity cap.
    pub capacity: u64,
    /// Units allocated so far.
    pub allocated: u64,
    /// `capacity - allocated`.
    pub remaining: u64,
    /// Tier metadata URI (may be empty).
    pub descriptor: String,
}

/// Read-only view of an address's allow-list grant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListStatus {
    /// Eligibility flag.
    pub eligible: bool,
    /// Free units left.
    pub remaining: u32,
}

/// Read-only view of the whole sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleStatus {
    /// Paused flag.
    pub paused: bool,
    /// Public latch.
    pub public_live: bool,
    /// Unit price in wei.
    pub mint_price: U256,
    /// Per-requester cap.
    pub max_per_address: u64,
    /// Per-call cap.
    pub max_per_call: u32,
    /// Units allocated across all tiers.
    pub total_minted: u64,
    /// Sum of tier capacities.
    pub global_cap: u64,
    /// Retained proceeds awaiting withdrawal.
    pub proceeds: U256,
    /// Current owner.
    pub owner: Address,
}

// =============================================================================
// TESTS
// =============================================================================
