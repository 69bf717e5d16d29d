//! # Mint State (Transactional Arena)
//!
//! All mutable counters of the engine as plain value records, plus the pure
//! transaction logic of every entry point.
//!
//! The service clones a `MintState`, runs one entry point on the clone and
//! swaps the clone in only when the whole request succeeded. Each entry
//! point therefore validates everything up front and may return early with
//! `?` at any point: a failed transaction is simply dropped.
//!
//! Allocation records and events are not kept here. They are staged in
//! [`Effects`] and appended to the [`AllocationBook`] and event log on commit.

use crate::config::MintConfig;
use crate::domain::allocator::{draw_tier, DrawInput};
use crate::domain::entities::{
    AllocatedUnit, AllocationRecord, AllowListStatus, MintPath, MintReceipt, SaleStatus,
    TierStatus,
};
use crate::domain::lifecycle::LifecycleGate;
use crate::domain::quota::{AllowList, QuotaLedger};
use crate::domain::registry::TierRegistry;
use crate::domain::services::compose_token_uri;
use crate::domain::settlement::{settle, Settlement};
use crate::domain::value_objects::{Address, Hash, Tier, TokenId, U256};
use crate::errors::MintError;
use crate::events::MintEvent;

// =============================================================================
// EFFECTS
// =============================================================================

/// Side effects staged by one transaction, applied only on commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    /// New allocation records, in id order.
    pub records: Vec<AllocationRecord>,
    /// Events, in emission order.
    pub events: Vec<MintEvent>,
}

impl Effects {
    /// Creates an empty effect set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, event: MintEvent) {
        self.events.push(event);
    }
}

// =============================================================================
// ALLOCATION BOOK
// =============================================================================

/// Append-only list of allocation records; `records[i].id == i + 1`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocationBook {
    records: Vec<AllocationRecord>,
}

impl AllocationBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for `id`, if allocated.
    #[must_use]
    pub fn get(&self, id: TokenId) -> Option<&AllocationRecord> {
        let index = usize::try_from(id.get().checked_sub(1)?).ok()?;
        self.records.get(index)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing was allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in id order.
    #[must_use]
    pub fn records(&self) -> &[AllocationRecord] {
        &self.records
    }

    /// Appends staged records.
    pub fn append(&mut self, records: Vec<AllocationRecord>) {
        self.records.extend(records);
    }
}

// =============================================================================
// MINT STATE
// =============================================================================

/// Every mutable counter of the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintState {
    registry: TierRegistry,
    quota: QuotaLedger,
    allow_list: AllowList,
    lifecycle: LifecycleGate,
    next_id: TokenId,
    mint_price: U256,
    max_per_address: u64,
    max_per_call: u32,
    base_uri: String,
    owner: Address,
    proceeds: U256,
    privileged_respects_pause: bool,
}

impl MintState {
    /// Builds the initial state from a validated configuration.
    ///
    /// # Errors
    /// - `Config` if [`MintConfig::validate`] rejects the configuration
    /// - `Overflow` if the tier capacities do not sum within `u64`
    pub fn from_config(config: &MintConfig) -> Result<Self, MintError> {
        config.validate()?;

        let mut registry = TierRegistry::new(config.tier_capacities)?;
        for tier in Tier::ALL {
            registry.set_descriptor(tier, config.tier_uris[tier.index()].clone());
        }

        Ok(Self {
            registry,
            quota: QuotaLedger::new(),
            allow_list: AllowList::new(),
            lifecycle: LifecycleGate::new(config.start_paused),
            next_id: TokenId::FIRST,
            mint_price: config.mint_price,
            max_per_address: config.max_per_address,
            max_per_call: config.max_per_call,
            base_uri: config.base_uri.clone(),
            owner: config.owner,
            proceeds: U256::zero(),
            privileged_respects_pause: config.privileged_respects_pause,
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Tier registry.
    #[must_use]
    pub fn registry(&self) -> &TierRegistry {
        &self.registry
    }

    /// Quota ledger.
    #[must_use]
    pub fn quota(&self) -> &QuotaLedger {
        &self.quota
    }

    /// Allow list.
    #[must_use]
    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Lifecycle flags.
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleGate {
        &self.lifecycle
    }

    /// Id the next allocated unit will receive.
    #[must_use]
    pub fn next_id(&self) -> TokenId {
        self.next_id
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Retained proceeds.
    #[must_use]
    pub fn proceeds(&self) -> U256 {
        self.proceeds
    }

    /// Per-tier snapshot.
    #[must_use]
    pub fn tier_status(&self, tier: Tier) -> TierStatus {
        self.registry.status(tier)
    }

    /// Quota usage of `requester`.
    #[must_use]
    pub fn usage(&self, requester: &Address) -> u64 {
        self.quota.usage(requester)
    }

    /// Allow-list status of `user`.
    #[must_use]
    pub fn allow_list_status(&self, user: &Address) -> AllowListStatus {
        self.allow_list.status(user)
    }

    /// Whole-sale snapshot.
    #[must_use]
    pub fn sale_status(&self) -> SaleStatus {
        SaleStatus {
            paused: self.lifecycle.is_paused(),
            public_live: self.lifecycle.is_public(),
            mint_price: self.mint_price,
            max_per_address: self.max_per_address,
            max_per_call: self.max_per_call,
            total_minted: self.registry.total_allocated(),
            global_cap: self.registry.total_capacity(),
            proceeds: self.proceeds,
            owner: self.owner,
        }
    }

    /// Metadata pointer for an allocated id whose tier is `tier`.
    #[must_use]
    pub fn token_uri(&self, id: TokenId, tier: Tier) -> Option<String> {
        compose_token_uri(self.registry.descriptor(tier), &self.base_uri, id)
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    fn ensure_owner(&self, caller: &Address) -> Result<(), MintError> {
        if *caller != self.owner {
            return Err(MintError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    fn ensure_quantity(&self, units: u32) -> Result<(), MintError> {
        if units == 0 || units > self.max_per_call {
            return Err(MintError::InvalidQuantity {
                requested: units,
                max: self.max_per_call,
            });
        }
        Ok(())
    }

    /// `NoAvailability` once every tier is exhausted, `GlobalCapExceeded` when
    /// some room is left but not enough for `units`.
    fn ensure_global_headroom(&self, units: u64) -> Result<(), MintError> {
        let remaining = self.registry.total_remaining();
        if remaining == 0 {
            return Err(MintError::NoAvailability);
        }
        if units > remaining {
            return Err(MintError::GlobalCapExceeded {
                requested: units,
                remaining,
            });
        }
        Ok(())
    }

    // =========================================================================
    // ALLOCATION
    // =========================================================================

    /// Draws, reserves and records `units` units for `recipient`.
    fn allocate(
        &mut self,
        recipient: Address,
        units: u32,
        path: MintPath,
        seed: &Hash,
        effects: &mut Effects,
    ) -> Result<Vec<AllocatedUnit>, MintError> {
        let mut allocated = Vec::with_capacity(units as usize);
        for _ in 0..units {
            let id = self.next_id;
            let tier = draw_tier(
                &self.registry,
                &DrawInput {
                    seed,
                    requester: &recipient,
                    nonce: id,
                },
            )?;
            self.registry.reserve(tier)?;
            self.next_id = id.next().ok_or(MintError::Overflow)?;

            effects.records.push(AllocationRecord {
                id,
                minted_to: recipient,
                tier,
                path,
            });
            effects.emit(MintEvent::Allocated {
                requester: recipient,
                id,
                tier,
            });
            allocated.push(AllocatedUnit { id, tier });
        }

        effects.emit(MintEvent::BatchMinted {
            requester: recipient,
            ids: allocated.iter().map(|unit| unit.id).collect(),
        });
        Ok(allocated)
    }

    // =========================================================================
    // ENTRY POINTS
    // =========================================================================

    /// Paid public mint.
    ///
    /// The returned receipt's `refund` is owed to `requester`; the caller must
    /// pay it out before committing.
    ///
    /// # Errors
    /// - `ZeroAddress`, `Paused`, `NotPublic`, `InvalidQuantity`
    /// - `InsufficientPayment`, `NoAvailability`, `GlobalCapExceeded`, `QuotaExceeded`
    pub fn mint_public(
        &mut self,
        requester: Address,
        units: u32,
        paid: U256,
        seed: &Hash,
        effects: &mut Effects,
    ) -> Result<MintReceipt, MintError> {
        if requester.is_zero() {
            return Err(MintError::ZeroAddress);
        }
        self.lifecycle.require_public_live()?;
        self.ensure_quantity(units)?;
        let settlement = settle(paid, self.mint_price, units)?;
        self.ensure_global_headroom(u64::from(units))?;
        self.quota
            .check(&requester, u64::from(units), self.max_per_address)?;

        let allocated = self.allocate(requester, units, MintPath::Public, seed, effects)?;
        self.quota.record(requester, u64::from(units))?;
        self.proceeds = self
            .proceeds
            .checked_add(settlement.cost)
            .ok_or(MintError::Overflow)?;

        Ok(MintReceipt {
            recipient: requester,
            path: MintPath::Public,
            units: allocated,
            cost: settlement.cost,
            refund: settlement.refund,
        })
    }

    /// Free single-unit allow-list mint.
    ///
    /// # Errors
    /// - `ZeroAddress`, `Paused`, `NotEligible`
    /// - `QuotaExceeded`, `NoAvailability`
    pub fn mint_allow_list(
        &mut self,
        requester: Address,
        seed: &Hash,
        effects: &mut Effects,
    ) -> Result<MintReceipt, MintError> {
        if requester.is_zero() {
            return Err(MintError::ZeroAddress);
        }
        self.lifecycle.require_live()?;
        self.allow_list.ensure_eligible(&requester)?;
        self.quota.check(&requester, 1, self.max_per_address)?;
        self.ensure_global_headroom(1)?;

        let allocated = self.allocate(requester, 1, MintPath::AllowList, seed, effects)?;
        self.allow_list.consume_free(&requester)?;
        self.quota.record(requester, 1)?;

        let settlement = Settlement::free();
        Ok(MintReceipt {
            recipient: requester,
            path: MintPath::AllowList,
            units: allocated,
            cost: settlement.cost,
            refund: settlement.refund,
        })
    }

    /// Owner mint to `to`, exempt from quota, payment and the public latch.
    ///
    /// # Errors
    /// - `NotOwner`, `ZeroAddress`, `InvalidQuantity`
    /// - `Paused` only when configured to respect pause
    /// - `NoAvailability`, `GlobalCapExceeded`
    pub fn mint_privileged(
        &mut self,
        caller: Address,
        to: Address,
        units: u32,
        seed: &Hash,
        effects: &mut Effects,
    ) -> Result<MintReceipt, MintError> {
        self.ensure_owner(&caller)?;
        if to.is_zero() {
            return Err(MintError::ZeroAddress);
        }
        if self.privileged_respects_pause {
            self.lifecycle.require_live()?;
        }
        self.ensure_quantity(units)?;
        self.ensure_global_headroom(u64::from(units))?;

        let allocated = self.allocate(to, units, MintPath::Privileged, seed, effects)?;

        let settlement = Settlement::free();
        Ok(MintReceipt {
            recipient: to,
            path: MintPath::Privileged,
            units: allocated,
            cost: settlement.cost,
            refund: settlement.refund,
        })
    }

    // =========================================================================
    // ADMINISTRATION (owner only)
    // =========================================================================

    /// # Errors
    /// - `NotOwner`
    pub fn set_mint_price(
        &mut self,
        caller: Address,
        price: U256,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        let old = std::mem::replace(&mut self.mint_price, price);
        effects.emit(MintEvent::PriceChanged { old, new: price });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`
    /// - `InvalidQuantity` for zero
    pub fn set_max_per_address(
        &mut self,
        caller: Address,
        max: u64,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        if max == 0 {
            return Err(MintError::InvalidQuantity {
                requested: 0,
                max: self.max_per_call,
            });
        }
        let old = std::mem::replace(&mut self.max_per_address, max);
        effects.emit(MintEvent::MaxPerAddressChanged { old, new: max });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `EmptyString`
    pub fn set_base_uri(
        &mut self,
        caller: Address,
        uri: String,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        if uri.is_empty() {
            return Err(MintError::EmptyString { field: "base uri" });
        }
        self.base_uri.clone_from(&uri);
        effects.emit(MintEvent::BaseUriChanged { uri });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `EmptyString`
    pub fn update_tier_uri(
        &mut self,
        caller: Address,
        tier: Tier,
        uri: String,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        if uri.is_empty() {
            return Err(MintError::EmptyString { field: "tier uri" });
        }
        self.registry.set_descriptor(tier, uri.clone());
        effects.emit(MintEvent::TierUriChanged { tier, uri });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `AlreadyPaused`
    pub fn pause(&mut self, caller: Address, effects: &mut Effects) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        self.lifecycle.pause()?;
        effects.emit(MintEvent::PauseToggled { paused: true });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `AlreadyUnpaused`
    pub fn unpause(&mut self, caller: Address, effects: &mut Effects) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        self.lifecycle.unpause()?;
        effects.emit(MintEvent::PauseToggled { paused: false });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `AlreadyPublic`
    pub fn go_public(&mut self, caller: Address, effects: &mut Effects) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        self.lifecycle.go_public()?;
        effects.emit(MintEvent::PublicLaunched);
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `ZeroAddress`, `InvalidQuantity`, `Overflow`
    pub fn grant_or_top_up_allow_list(
        &mut self,
        caller: Address,
        user: Address,
        extra_units: u32,
        effects: &mut Effects,
    ) -> Result<u32, MintError> {
        self.ensure_owner(&caller)?;
        let remaining = self.allow_list.grant_or_top_up(user, extra_units)?;
        effects.emit(MintEvent::AllowListGranted { user, remaining });
        Ok(remaining)
    }

    /// # Errors
    /// - `NotOwner`, `NotEligible`
    pub fn revoke_allow_list(
        &mut self,
        caller: Address,
        user: Address,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        self.allow_list.revoke(&user)?;
        effects.emit(MintEvent::AllowListRevoked { user });
        Ok(())
    }

    /// # Errors
    /// - `NotOwner`, `ZeroAddress`
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
        effects: &mut Effects,
    ) -> Result<(), MintError> {
        self.ensure_owner(&caller)?;
        if new_owner.is_zero() {
            return Err(MintError::ZeroAddress);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        effects.emit(MintEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        });
        Ok(())
    }

    /// Zeroes proceeds and returns the amount owed to the owner.
    ///
    /// The caller must transfer the amount before committing.
    ///
    /// # Errors
    /// - `NotOwner`, `NothingToWithdraw`
    pub fn withdraw_proceeds(
        &mut self,
        caller: Address,
        effects: &mut Effects,
    ) -> Result<U256, MintError> {
        self.ensure_owner(&caller)?;
        if self.proceeds.is_zero() {
            return Err(MintError::NothingToWithdraw);
        }
        let amount = std::mem::replace(&mut self.proceeds, U256::zero());
        effects.emit(MintEvent::ProceedsWithdrawn {
            to: self.owner,
            amount,
        });
        Ok(amount)
    }
}

// =============================================================================
// TESTS
// =============================================================================
