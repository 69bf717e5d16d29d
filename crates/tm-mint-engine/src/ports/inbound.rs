//! # Driving Ports (API - Inbound)
//!
//! The interfaces exposed by the issuance engine. Requesters use
//! [`MintApi`], the owner uses [`MintAdminApi`], and anyone may read
//! committed state through [`MintQueryApi`].
//!
//! Every mutating method is one all-or-nothing transaction: on `Err` nothing
//! changed and nothing was emitted.

use crate::domain::entities::{AllowListStatus, MintReceipt, SaleStatus, TierStatus};
use crate::domain::value_objects::{Address, Tier, TokenId, U256};
use crate::errors::MintError;
use crate::events::MintEvent;
use async_trait::async_trait;

// =============================================================================
// MINT API (Primary Driving Port)
// =============================================================================

/// Allocation entry points.
///
/// ## Usage
///
/// ```ignore
/// let receipt = api.mint_public(requester, 3, milli_ether(150)).await?;
/// for unit in &receipt.units {
///     println!("{} -> {}", unit.id, unit.tier);
/// }
/// ```
#[async_trait]
pub trait MintApi: Send + Sync {
    /// Paid mint of `units` units.
    ///
    /// Requires the sale to be live and public. `paid` above
    /// `mint_price * units` is refunded to `requester` before commit.
    async fn mint_public(
        &self,
        requester: Address,
        units: u32,
        paid: U256,
    ) -> Result<MintReceipt, MintError>;

    /// Free mint of exactly one unit, consuming one allow-list unit.
    async fn mint_allow_list(&self, requester: Address) -> Result<MintReceipt, MintError>;

    /// Owner mint of `units` units to `to`, exempt from quota and payment.
    async fn mint_privileged(
        &self,
        caller: Address,
        to: Address,
        units: u32,
    ) -> Result<MintReceipt, MintError>;
}

// =============================================================================
// ADMIN API
// =============================================================================

/// Owner-only administration. Every method fails with `NotOwner` for any
/// other caller.
#[async_trait]
pub trait MintAdminApi: Send + Sync {
    /// Replaces the unit price.
    async fn set_mint_price(&self, caller: Address, price: U256) -> Result<(), MintError>;

    /// Replaces the per-requester cap. Existing usage is kept.
    async fn set_max_per_address(&self, caller: Address, max: u64) -> Result<(), MintError>;

    /// Replaces the base metadata URI.
    async fn set_base_uri(&self, caller: Address, uri: String) -> Result<(), MintError>;

    /// Replaces one tier's metadata URI.
    async fn update_tier_uri(
        &self,
        caller: Address,
        tier: Tier,
        uri: String,
    ) -> Result<(), MintError>;

    /// Live -> Paused.
    async fn pause(&self, caller: Address) -> Result<(), MintError>;

    /// Paused -> Live.
    async fn unpause(&self, caller: Address) -> Result<(), MintError>;

    /// Sets the one-way public latch.
    async fn go_public(&self, caller: Address) -> Result<(), MintError>;

    /// Marks `user` eligible and adds `extra_units` free units.
    ///
    /// Returns the new remaining count.
    async fn grant_or_top_up_allow_list(
        &self,
        caller: Address,
        user: Address,
        extra_units: u32,
    ) -> Result<u32, MintError>;

    /// Removes `user`'s grant.
    async fn revoke_allow_list(&self, caller: Address, user: Address) -> Result<(), MintError>;

    /// Transfers all retained proceeds to the owner.
    ///
    /// Returns the amount sent. Proceeds are untouched on failure.
    async fn withdraw_proceeds(&self, caller: Address) -> Result<U256, MintError>;

    /// Moves the owner capability to `new_owner`.
    async fn transfer_ownership(&self, caller: Address, new_owner: Address)
        -> Result<(), MintError>;
}

// =============================================================================
// QUERY API
// =============================================================================

/// Read-only view of committed state.
#[async_trait]
pub trait MintQueryApi: Send + Sync {
    /// Snapshot of one tier.
    async fn tier_status(&self, tier: Tier) -> TierStatus;

    /// Snapshots of all tiers in id order.
    async fn tier_statuses(&self) -> Vec<TierStatus>;

    /// Lifecycle flags, price, limits, totals, proceeds and owner.
    async fn sale_status(&self) -> SaleStatus;

    /// Units counted against `requester`'s quota.
    async fn usage_of(&self, requester: Address) -> u64;

    /// Allow-list status of `user`.
    async fn allow_list_status(&self, user: Address) -> AllowListStatus;

    /// Tier of an allocated id.
    ///
    /// # Errors
    /// - `UnknownToken` if `id` was never allocated
    async fn tier_of(&self, id: TokenId) -> Result<Tier, MintError>;

    /// Current holder of an allocated id.
    ///
    /// # Errors
    /// - `UnknownToken` if `id` was never allocated
    async fn owner_of(&self, id: TokenId) -> Result<Address, MintError>;

    /// Ids held by `owner`, ascending.
    async fn tokens_of_owner(&self, owner: Address) -> Vec<TokenId>;

    /// Metadata pointer of an allocated id; `None` when no URI is configured.
    ///
    /// # Errors
    /// - `UnknownToken` if `id` was never allocated
    async fn token_uri(&self, id: TokenId) -> Result<Option<String>, MintError>;

    /// Committed events in emission order.
    async fn events(&self) -> Vec<MintEvent>;
}
