//! # Tiered Mint Engine - Capacity-Weighted Issuance
//!
//! Allocates numbered units from a fixed-size pool split into three tiers.
//! Each unit's tier is drawn at random, weighted by the remaining capacity
//! of every tier, so scarce tiers stay scarce and exhausted tiers are never
//! drawn.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `allocated(t) <= capacity(t)` | `domain/registry.rs` - `TierRegistry::reserve()` |
//! | `Σ allocated <= global cap` | `domain/state.rs` - global headroom check |
//! | Ids `1..n`, never reused or skipped | `domain/state.rs` - `MintState::allocate()` |
//! | Quota on public and allow-list paths | `domain/quota.rs` - `QuotaLedger::check()` |
//! | Allow-list grant of N permits exactly N | `domain/quota.rs` - `AllowList::consume_free()` |
//! | All-or-nothing transactions | `service.rs` - working copy, `prepare()` + `apply()` |
//! | Serialized, non-reentrant calls | `guard.rs` - `ReentrancyGuard::run()` |
//!
//! All of them are checked together by `domain/invariants.rs` -
//! `check_all_invariants()`.
//!
//! ## Entry Points
//!
//! | Entry point | Gate | Payment | Quota |
//! |-------------|------|---------|-------|
//! | `mint_public` | live and public | `price * units`, overpayment refunded | yes |
//! | `mint_allow_list` | live | free, one unit | yes |
//! | `mint_privileged` | owner (pause optional) | free | no |
//!
//! ## Reference Sale Parameters
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Tier capacities | 600 / 300 / 100 |
//! | Unit price | 0.05 ether |
//! | `max_per_address` | 10 |
//! | `max_per_call` | 5 |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `TokenLedger` | Ownership of allocated ids |
//! | `PaymentCustody` | Refunds and proceeds withdrawal |
//! | `EntropySource` | Seed for tier draws |
//! | `EventPublisher` | Fan-out of committed events |
//!
//! ## Usage Example
//!
//! ```ignore
//! use tm_mint_engine::prelude::*;
//!
//! let service = create_test_service();
//! service.go_public(owner).await?;
//!
//! let receipt = service.mint_public(requester, 3, milli_ether(150)).await?;
//! for unit in &receipt.units {
//!     println!("{} is {}", unit.id, unit.tier);
//! }
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod guard;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        AllocatedUnit, AllocationRecord, AllowListStatus, MintPath, MintReceipt, SaleStatus,
        TierStatus,
    };

    // Value objects
    pub use crate::domain::value_objects::{milli_ether, Address, Hash, Tier, TokenId, U256};

    // Domain services
    pub use crate::domain::allocator::{draw_tier, select_by_weight, DrawInput};
    pub use crate::domain::services::{compose_token_uri, keccak256};
    pub use crate::domain::state::{AllocationBook, Effects, MintState};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{MintAdminApi, MintApi, MintQueryApi};
    pub use crate::ports::outbound::{EntropySource, EventPublisher, PaymentCustody, TokenLedger};

    // Configuration
    pub use crate::config::{ConfigError, MintConfig};

    // Errors
    pub use crate::errors::{ErrorKind, LedgerError, MintError, TransferError};

    // Events
    pub use crate::events::{topics, MintEvent};

    // Adapters
    pub use crate::adapters::{
        BlockContext, BlockEntropy, FixedEntropy, InMemoryCustody, InMemoryEventLog,
        InMemoryLedger, NoOpPublisher, OsEntropy,
    };

    // Service
    pub use crate::service::{create_test_service, MintService, ServiceConfig, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name used in logs.
pub const ENGINE_NAME: &str = "Tiered Mint";

// =============================================================================
// TESTS
// =============================================================================
