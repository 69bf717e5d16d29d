//! # Mint Service
//!
//! The issuance coordinator: wires the pure domain transaction to the
//! ownership ledger, payment custody, entropy source and event publisher.
//!
//! ## Transaction Model
//!
//! Every mutating call:
//! 1. enters the [`ReentrancyGuard`]: waits for the transaction in flight,
//!    or fails with `Reentrancy` when called from inside one
//! 2. clones the committed [`MintState`] into a working copy
//! 3. runs the domain transaction on the copy, staging records and events
//! 4. prepares: checks the ledger can take every staged id
//! 5. performs the outbound transfer, if any, while holding no state lock
//! 6. applies: writes the ledger, swaps the copy in, appends records and
//!    events, then publishes the events once the locks are released
//!
//! A failure at any step before the transfer completes drops the working
//! copy; nothing was mutated, paid or emitted. Queries read committed state
//! only.

use crate::adapters::{FixedEntropy, InMemoryCustody, InMemoryEventLog, InMemoryLedger};
use crate::config::MintConfig;
use crate::domain::entities::{
    AllowListStatus, MintPath, MintReceipt, SaleStatus, TierStatus,
};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::state::{AllocationBook, Effects, MintState};
use crate::domain::value_objects::{Address, Hash, Tier, TokenId, U256};
use crate::errors::{LedgerError, MintError};
use crate::events::MintEvent;
use crate::guard::ReentrancyGuard;
use crate::ports::inbound::{MintAdminApi, MintApi, MintQueryApi};
use crate::ports::outbound::{EntropySource, EventPublisher, PaymentCustody, TokenLedger};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// Mint Service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Sale parameters.
    pub mint: MintConfig,
    /// Evaluate the domain invariants after every commit.
    pub check_invariants: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mint: MintConfig::default(),
            check_invariants: cfg!(debug_assertions),
        }
    }
}

/// Statistics for the Mint Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Committed public mints.
    pub public_mints: u64,
    /// Committed allow-list mints.
    pub allow_list_mints: u64,
    /// Committed privileged mints.
    pub privileged_mints: u64,
    /// Units allocated over all paths.
    pub units_allocated: u64,
    /// Refund transfers paid out.
    pub refunds_paid: u64,
    /// Committed admin operations.
    pub admin_operations: u64,
    /// Failed requests of any kind.
    pub rejected_requests: u64,
    /// Failed requests rejected by the reentrancy guard.
    pub reentrancy_rejections: u64,
}

/// The main Mint Service.
///
/// This service:
/// 1. Runs every entry point as one atomic transaction
/// 2. Records allocations in the ledger and the allocation book
/// 3. Publishes committed events
/// 4. Maintains request statistics
pub struct MintService<L, P, E, B>
where
    L: TokenLedger,
    P: PaymentCustody,
    E: EntropySource,
    B: EventPublisher,
{
    /// Service configuration.
    config: ServiceConfig,
    /// Committed transactional state.
    state: Arc<RwLock<MintState>>,
    /// Committed allocation records.
    book: Arc<RwLock<AllocationBook>>,
    /// Committed events.
    events: Arc<RwLock<Vec<MintEvent>>>,
    /// Serializes mutating calls and rejects nested ones.
    guard: ReentrancyGuard,
    /// Ownership ledger.
    ledger: Arc<L>,
    /// Payment custody.
    custody: Arc<P>,
    /// Seed source for tier draws.
    entropy: Arc<E>,
    /// Event fan-out.
    publisher: Arc<B>,
    /// Service statistics.
    stats: Arc<RwLock<ServiceStats>>,
}

impl<L, P, E, B> MintService<L, P, E, B>
where
    L: TokenLedger,
    P: PaymentCustody,
    E: EntropySource,
    B: EventPublisher,
{
    /// Create a new Mint Service.
    ///
    /// # Errors
    ///
    /// Returns `MintError::Config` if [`MintConfig::validate`] rejects the
    /// sale parameters.
    pub fn new(
        ledger: L,
        custody: P,
        entropy: E,
        publisher: B,
        config: ServiceConfig,
    ) -> Result<Self, MintError> {
        let state = MintState::from_config(&config.mint)?;
        info!(
            global_cap = state.registry().total_capacity(),
            owner = %state.owner(),
            paused = state.lifecycle().is_paused(),
            "Mint service created"
        );

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(state)),
            book: Arc::new(RwLock::new(AllocationBook::new())),
            events: Arc::new(RwLock::new(Vec::new())),
            guard: ReentrancyGuard::new(),
            ledger: Arc::new(ledger),
            custody: Arc::new(custody),
            entropy: Arc::new(entropy),
            publisher: Arc::new(publisher),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Ownership ledger adapter.
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Payment custody adapter.
    pub fn custody(&self) -> &Arc<P> {
        &self.custody
    }

    /// Entropy adapter.
    pub fn entropy(&self) -> &Arc<E> {
        &self.entropy
    }

    /// Event publisher adapter.
    pub fn publisher(&self) -> &Arc<B> {
        &self.publisher
    }

    /// Whether a mutating call is in flight.
    pub fn is_busy(&self) -> bool {
        self.guard.is_entered()
    }

    /// Evaluates every domain invariant against committed state.
    pub async fn check_invariants(&self) -> InvariantCheckResult {
        let state = self.state.read().await;
        let book = self.book.read().await;
        check_all_invariants(&state, &book)
    }

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    async fn working_copy(&self) -> MintState {
        self.state.read().await.clone()
    }

    /// Runs a mint on a working copy, pays the refund and commits.
    async fn run_mint<F>(
        &self,
        path: MintPath,
        recipient: Address,
        op: F,
    ) -> Result<MintReceipt, MintError>
    where
        F: FnOnce(&mut MintState, &Hash, &mut Effects) -> Result<MintReceipt, MintError>,
    {
        self.guard
            .run(async {
                let mut working = self.working_copy().await;
                let seed = self.entropy.seed(&recipient);
                let mut effects = Effects::new();

                let receipt = op(&mut working, &seed, &mut effects)?;
                let settlement = receipt.settlement();

                // Everything that can still fail runs before value leaves custody
                self.prepare(&effects)?;
                if settlement.needs_refund() {
                    debug!(to = %receipt.recipient, amount = %settlement.refund, "Paying refund");
                    self.custody
                        .send_value(receipt.recipient, settlement.refund)
                        .await
                        .map_err(|source| MintError::RefundFailed {
                            amount: settlement.refund,
                            source,
                        })?;
                }

                self.apply(working, effects).await?;

                {
                    let mut stats = self.stats.write().await;
                    match path {
                        MintPath::Public => stats.public_mints += 1,
                        MintPath::AllowList => stats.allow_list_mints += 1,
                        MintPath::Privileged => stats.privileged_mints += 1,
                    }
                    stats.units_allocated += receipt.len() as u64;
                    if settlement.needs_refund() {
                        stats.refunds_paid += 1;
                    }
                }

                #[cfg(feature = "metrics")]
                {
                    tm_telemetry::metrics::record_units_minted(path.as_str(), receipt.len() as u64);
                    if settlement.needs_refund() {
                        tm_telemetry::metrics::record_refund();
                    }
                }

                info!(
                    path = path.as_str(),
                    recipient = %receipt.recipient,
                    ids = ?receipt.ids(),
                    cost = %settlement.cost,
                    "Mint committed"
                );
                Ok::<_, MintError>(receipt)
            })
            .await
    }

    /// Runs an owner operation on a working copy and commits.
    async fn run_admin<T, F>(&self, op: F) -> Result<T, MintError>
    where
        F: FnOnce(&mut MintState, &mut Effects) -> Result<T, MintError>,
    {
        self.guard
            .run(async {
                let mut working = self.working_copy().await;
                let mut effects = Effects::new();

                let output = op(&mut working, &mut effects)?;

                self.prepare(&effects)?;
                self.apply(working, effects).await?;
                self.stats.write().await.admin_operations += 1;
                Ok::<_, MintError>(output)
            })
            .await
    }

    /// Checks that the ledger can take every staged id.
    ///
    /// Runs before any outbound transfer, so a foreign ledger entry aborts
    /// the request while nothing has been paid or written.
    fn prepare(&self, effects: &Effects) -> Result<(), MintError> {
        if let Some(taken) = effects
            .records
            .iter()
            .find(|record| self.ledger.owner_of(record.id).is_some())
        {
            error!(id = %taken.id, "Ledger already holds a fresh id");
            return Err(LedgerError::AlreadyMinted(taken.id).into());
        }
        Ok(())
    }

    /// Makes a prepared working copy and its staged effects the committed
    /// state, then publishes the events with every lock released.
    async fn apply(&self, working: MintState, effects: Effects) -> Result<(), MintError> {
        let Effects { records, events } = effects;
        {
            let mut state = self.state.write().await;
            let mut book = self.book.write().await;

            for record in &records {
                self.ledger.mint(record.minted_to, record.id)?;
            }
            *state = working;
            book.append(records);
            self.events.write().await.extend(events.iter().cloned());

            #[cfg(feature = "metrics")]
            for tier in Tier::ALL {
                tm_telemetry::metrics::set_tier_remaining(
                    tier.name(),
                    state.registry().remaining(tier),
                );
            }

            if self.config.check_invariants {
                if let InvariantCheckResult::Invalid(violations) =
                    check_all_invariants(&state, &book)
                {
                    for violation in &violations {
                        error!(%violation, "Invariant violated after commit");
                    }
                    debug_assert!(violations.is_empty(), "invariants violated: {violations:?}");
                }
            }
        }

        for event in &events {
            self.publisher.publish(event);
        }
        Ok(())
    }

    /// Logs and counts a failed request.
    async fn reject<T>(
        &self,
        operation: &'static str,
        result: Result<T, MintError>,
    ) -> Result<T, MintError> {
        if let Err(err) = &result {
            warn!(operation, kind = err.kind().as_str(), error = %err, "Request rejected");
            let mut stats = self.stats.write().await;
            stats.rejected_requests += 1;
            if matches!(err, MintError::Reentrancy) {
                stats.reentrancy_rejections += 1;
            }

            #[cfg(feature = "metrics")]
            tm_telemetry::metrics::record_rejection(err.kind().as_str());
        }
        result
    }
}

/// Create a test service with in-memory adapters, a fixed seed and the
/// reference sale parameters.
///
/// # Panics
///
/// Never: the reference parameters are valid.
#[must_use]
pub fn create_test_service(
) -> MintService<InMemoryLedger, InMemoryCustody, FixedEntropy, InMemoryEventLog> {
    match MintService::new(
        InMemoryLedger::new(),
        InMemoryCustody::new(),
        FixedEntropy(Hash::new([0x5e; 32])),
        InMemoryEventLog::new(),
        ServiceConfig {
            check_invariants: true,
            ..ServiceConfig::default()
        },
    ) {
        Ok(service) => service,
        Err(err) => unreachable!("reference configuration rejected: {err}"),
    }
}

// =============================================================================
// MINT API
// =============================================================================

#[async_trait]
impl<L, P, E, B> MintApi for MintService<L, P, E, B>
where
    L: TokenLedger,
    P: PaymentCustody,
    E: EntropySource,
    B: EventPublisher,
{
    #[instrument(skip(self), fields(requester = %requester, paid = %paid))]
    async fn mint_public(
        &self,
        requester: Address,
        units: u32,
        paid: U256,
    ) -> Result<MintReceipt, MintError> {
        #[cfg(feature = "metrics")]
        let _timer = tm_telemetry::metrics::start_request_timer("mint_public");

        let result = self
            .run_mint(MintPath::Public, requester, |state, seed, effects| {
                state.mint_public(requester, units, paid, seed, effects)
            })
            .await;
        self.reject("mint_public", result).await
    }

    #[instrument(skip(self), fields(requester = %requester))]
    async fn mint_allow_list(&self, requester: Address) -> Result<MintReceipt, MintError> {
        #[cfg(feature = "metrics")]
        let _timer = tm_telemetry::metrics::start_request_timer("mint_allow_list");

        let result = self
            .run_mint(MintPath::AllowList, requester, |state, seed, effects| {
                state.mint_allow_list(requester, seed, effects)
            })
            .await;
        self.reject("mint_allow_list", result).await
    }

    #[instrument(skip(self), fields(caller = %caller, to = %to))]
    async fn mint_privileged(
        &self,
        caller: Address,
        to: Address,
        units: u32,
    ) -> Result<MintReceipt, MintError> {
        #[cfg(feature = "metrics")]
        let _timer = tm_telemetry::metrics::start_request_timer("mint_privileged");

        let result = self
            .run_mint(MintPath::Privileged, to, |state, seed, effects| {
                state.mint_privileged(caller, to, units, seed, effects)
            })
            .await;
        self.reject("mint_privileged", result).await
    }
}

// =============================================================================
// ADMIN API
// =============================================================================

#[async_trait]
impl<L, P, E, B> MintAdminApi for MintService<L, P, E, B>
where
    L: TokenLedger,
    P: PaymentCustody,
    E: EntropySource,
    B: EventPublisher,
{
    #[instrument(skip(self), fields(caller = %caller, price = %price))]
    async fn set_mint_price(&self, caller: Address, price: U256) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.set_mint_price(caller, price, effects))
            .await;
        self.reject("set_mint_price", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn set_max_per_address(&self, caller: Address, max: u64) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.set_max_per_address(caller, max, effects))
            .await;
        self.reject("set_max_per_address", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn set_base_uri(&self, caller: Address, uri: String) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.set_base_uri(caller, uri, effects))
            .await;
        self.reject("set_base_uri", result).await
    }

    #[instrument(skip(self), fields(caller = %caller, tier = %tier))]
    async fn update_tier_uri(
        &self,
        caller: Address,
        tier: Tier,
        uri: String,
    ) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.update_tier_uri(caller, tier, uri, effects))
            .await;
        self.reject("update_tier_uri", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn pause(&self, caller: Address) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.pause(caller, effects))
            .await;
        if result.is_ok() {
            info!("Sale paused");
        }
        self.reject("pause", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn unpause(&self, caller: Address) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.unpause(caller, effects))
            .await;
        if result.is_ok() {
            info!("Sale unpaused");
        }
        self.reject("unpause", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn go_public(&self, caller: Address) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.go_public(caller, effects))
            .await;
        if result.is_ok() {
            info!("Public sale launched");
        }
        self.reject("go_public", result).await
    }

    #[instrument(skip(self), fields(caller = %caller, user = %user))]
    async fn grant_or_top_up_allow_list(
        &self,
        caller: Address,
        user: Address,
        extra_units: u32,
    ) -> Result<u32, MintError> {
        let result = self
            .run_admin(|state, effects| {
                state.grant_or_top_up_allow_list(caller, user, extra_units, effects)
            })
            .await;
        self.reject("grant_or_top_up_allow_list", result).await
    }

    #[instrument(skip(self), fields(caller = %caller, user = %user))]
    async fn revoke_allow_list(&self, caller: Address, user: Address) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.revoke_allow_list(caller, user, effects))
            .await;
        self.reject("revoke_allow_list", result).await
    }

    #[instrument(skip(self), fields(caller = %caller))]
    async fn withdraw_proceeds(&self, caller: Address) -> Result<U256, MintError> {
        let result = self
            .guard
            .run(async {
                let mut working = self.working_copy().await;
                let mut effects = Effects::new();

                let amount = working.withdraw_proceeds(caller, &mut effects)?;
                let owner = working.owner();
                self.custody
                    .send_value(owner, amount)
                    .await
                    .map_err(MintError::WithdrawalFailed)?;

                self.apply(working, effects).await?;
                self.stats.write().await.admin_operations += 1;
                info!(to = %owner, amount = %amount, "Proceeds withdrawn");
                Ok::<_, MintError>(amount)
            })
            .await;
        self.reject("withdraw_proceeds", result).await
    }

    #[instrument(skip(self), fields(caller = %caller, new_owner = %new_owner))]
    async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), MintError> {
        let result = self
            .run_admin(|state, effects| state.transfer_ownership(caller, new_owner, effects))
            .await;
        self.reject("transfer_ownership", result).await
    }
}

// =============================================================================
// QUERY API
// =============================================================================

#[async_trait]
impl<L, P, E, B> MintQueryApi for MintService<L, P, E, B>
where
    L: TokenLedger,
    P: PaymentCustody,
    E: EntropySource,
    B: EventPublisher,
{
    async fn tier_status(&self, tier: Tier) -> TierStatus {
        self.state.read().await.tier_status(tier)
    }

    async fn tier_statuses(&self) -> Vec<TierStatus> {
        self.state.read().await.registry().statuses()
    }

    async fn sale_status(&self) -> SaleStatus {
        self.state.read().await.sale_status()
    }

    async fn usage_of(&self, requester: Address) -> u64 {
        self.state.read().await.usage(&requester)
    }

    async fn allow_list_status(&self, user: Address) -> AllowListStatus {
        self.state.read().await.allow_list_status(&user)
    }

    async fn tier_of(&self, id: TokenId) -> Result<Tier, MintError> {
        self.book
            .read()
            .await
            .get(id)
            .map(|record| record.tier)
            .ok_or(MintError::UnknownToken(id))
    }

    async fn owner_of(&self, id: TokenId) -> Result<Address, MintError> {
        self.ledger
            .owner_of(id)
            .ok_or(MintError::UnknownToken(id))
    }

    async fn tokens_of_owner(&self, owner: Address) -> Vec<TokenId> {
        self.ledger.tokens_of_owner(&owner)
    }

    async fn token_uri(&self, id: TokenId) -> Result<Option<String>, MintError> {
        let tier = self.tier_of(id).await?;
        Ok(self.state.read().await.token_uri(id, tier))
    }

    async fn events(&self) -> Vec<MintEvent> {
        self.events.read().await.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
