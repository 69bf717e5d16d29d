//! # Event Schema
//!
//! Observable records of every committed state change. One event per change,
//! appended in commit order; a failed transaction emits nothing.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `Allocated` | every allocated unit, any path |
//! | `BatchMinted` | end of every mint request |
//! | `PriceChanged` | `set_mint_price` |
//! | `PauseToggled` | `pause` / `unpause` |
//! | `BaseUriChanged` / `TierUriChanged` | metadata setters |
//! | `MaxPerAddressChanged` | `set_max_per_address` |
//! | `PublicLaunched` | `go_public` |
//! | `AllowListGranted` / `AllowListRevoked` | allow-list admin |
//! | `ProceedsWithdrawn` | `withdraw_proceeds` |
//! | `OwnershipTransferred` | `transfer_ownership` |

use crate::domain::value_objects::{Address, Tier, TokenId, U256};
use serde::{Deserialize, Serialize};

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MintEvent {
    /// One unit allocated.
    Allocated {
        /// Recipient.
        requester: Address,
        /// Allocation id.
        id: TokenId,
        /// Tier drawn.
        tier: Tier,
    },
    /// Summary of one mint request.
    BatchMinted {
        /// Recipient.
        requester: Address,
        /// Ids allocated by the request, in order.
        ids: Vec<TokenId>,
    },
    /// Unit price changed.
    PriceChanged {
        /// Previous price (wei).
        old: U256,
        /// New price (wei).
        new: U256,
    },
    /// Pause flag flipped.
    PauseToggled {
        /// New value of the flag.
        paused: bool,
    },
    /// Base metadata URI replaced.
    BaseUriChanged {
        /// New URI.
        uri: String,
    },
    /// Tier metadata URI replaced.
    TierUriChanged {
        /// Tier updated.
        tier: Tier,
        /// New URI.
        uri: String,
    },
    /// Per-requester cap changed.
    MaxPerAddressChanged {
        /// Previous cap.
        old: u64,
        /// New cap.
        new: u64,
    },
    /// Public sale latch set.
    PublicLaunched,
    /// Allow-list grant created or topped up.
    AllowListGranted {
        /// Address granted.
        user: Address,
        /// Free units now remaining.
        remaining: u32,
    },
    /// Allow-list grant removed.
    AllowListRevoked {
        /// Address revoked.
        user: Address,
    },
    /// Proceeds paid out to the owner.
    ProceedsWithdrawn {
        /// Recipient.
        to: Address,
        /// Amount (wei).
        amount: U256,
    },
    /// Owner capability moved.
    OwnershipTransferred {
        /// Previous owner.
        previous: Address,
        /// New owner.
        new: Address,
    },
}

impl MintEvent {
    /// Topic the event is published under.
    #[must_use]
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Allocated { .. } | Self::BatchMinted { .. } => topics::ALLOCATION,
            Self::PriceChanged { .. } | Self::MaxPerAddressChanged { .. } => topics::SALE_PARAMS,
            Self::PauseToggled { .. } | Self::PublicLaunched => topics::LIFECYCLE,
            Self::BaseUriChanged { .. } | Self::TierUriChanged { .. } => topics::METADATA,
            Self::AllowListGranted { .. } | Self::AllowListRevoked { .. } => topics::ALLOW_LIST,
            Self::ProceedsWithdrawn { .. } | Self::OwnershipTransferred { .. } => topics::TREASURY,
        }
    }
}

// =============================================================================
// EVENT TOPICS
// =============================================================================

/// Topic names.
pub mod topics {
    /// Unit allocations and batch summaries.
    pub const ALLOCATION: &str = "mint.allocation";
    /// Price and quota parameters.
    pub const SALE_PARAMS: &str = "mint.sale_params";
    /// Pause and public-launch transitions.
    pub const LIFECYCLE: &str = "mint.lifecycle";
    /// Metadata pointers.
    pub const METADATA: &str = "mint.metadata";
    /// Allow-list administration.
    pub const ALLOW_LIST: &str = "mint.allow_list";
    /// Proceeds and ownership.
    pub const TREASURY: &str = "mint.treasury";
}

// =============================================================================
// TESTS
// =============================================================================
