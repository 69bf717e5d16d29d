//! # Error Types
//!
//! All error types for tiered issuance.
//!
//! Every `MintError` aborts the whole transaction it was raised in; nothing is
//! partially applied. `MintError::kind` maps each variant onto the coarse
//! taxonomy callers use to decide how to resubmit.

use crate::config::ConfigError;
use crate::domain::value_objects::{Address, Tier, TokenId, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERROR TAXONOMY
// =============================================================================

/// Coarse failure classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Zero address, empty string, out-of-range quantity, overflow.
    InvalidInput,
    /// Caller lacks the owner capability or allow-list eligibility.
    NotAuthorized,
    /// Paused, not yet public, repeated toggles, re-entry.
    LifecycleViolation,
    /// A tier or the global cap has no room for the request.
    CapacityExceeded,
    /// Every tier is exhausted.
    NoAvailability,
    /// Per-requester cap reached.
    QuotaExceeded,
    /// Payment below price times units.
    InsufficientPayment,
    /// Overpayment could not be returned.
    RefundFailed,
    /// Proceeds could not be withdrawn.
    WithdrawalFailed,
    /// The ownership ledger refused a write.
    Ledger,
}

impl ErrorKind {
    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotAuthorized => "not_authorized",
            Self::LifecycleViolation => "lifecycle_violation",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::NoAvailability => "no_availability",
            Self::QuotaExceeded => "quota_exceeded",
            Self::InsufficientPayment => "insufficient_payment",
            Self::RefundFailed => "refund_failed",
            Self::WithdrawalFailed => "withdrawal_failed",
            Self::Ledger => "ledger",
        }
    }
}

// =============================================================================
// MINT ERRORS
// =============================================================================

/// Errors raised by the issuance engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MintError {
    /// The zero address was supplied where an account is required.
    #[error("zero address not allowed")]
    ZeroAddress,

    /// A required string was empty.
    #[error("empty {field} not allowed")]
    EmptyString { field: &'static str },

    /// Sale parameters rejected at construction.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Quantity outside `1..=max`.
    #[error("invalid quantity: {requested} (allowed 1..={max})")]
    InvalidQuantity { requested: u32, max: u32 },

    /// Tier configured with zero capacity.
    #[error("tier {0} must have a positive capacity")]
    ZeroCapacity(Tier),

    /// Arithmetic on amounts or counters overflowed.
    #[error("arithmetic overflow")]
    Overflow,

    /// Queried id was never allocated.
    #[error("unknown token id {0}")]
    UnknownToken(TokenId),

    /// Caller does not hold the owner capability.
    #[error("caller {caller} is not the owner")]
    NotOwner { caller: Address },

    /// Requester has no active allow-list grant.
    #[error("{requester} is not eligible for an allow-list mint")]
    NotEligible { requester: Address },

    /// Entry point blocked while paused.
    #[error("minting is paused")]
    Paused,

    /// Public entry point blocked before launch.
    #[error("public sale has not started")]
    NotPublic,

    /// `pause` while already paused.
    #[error("already paused")]
    AlreadyPaused,

    /// `unpause` while already live.
    #[error("already unpaused")]
    AlreadyUnpaused,

    /// `go_public` after the latch was set.
    #[error("public sale already started")]
    AlreadyPublic,

    /// A mutating entry point was called from inside a transaction in flight.
    #[error("reentrant call rejected")]
    Reentrancy,

    /// Reservation on a full tier.
    #[error("tier {tier} capacity exceeded")]
    TierCapacityExceeded { tier: Tier },

    /// Not enough global headroom for the request.
    #[error("global cap exceeded: requested {requested}, remaining {remaining}")]
    GlobalCapExceeded { requested: u64, remaining: u64 },

    /// All tiers exhausted.
    #[error("no tier has remaining capacity")]
    NoAvailability,

    /// Per-requester cap would be exceeded.
    #[error("quota exceeded for {requester}: used {used} + requested {requested} > cap {cap}")]
    QuotaExceeded {
        requester: Address,
        used: u64,
        requested: u64,
        cap: u64,
    },

    /// Payment below price times units.
    #[error("insufficient payment: required {required}, paid {paid}")]
    InsufficientPayment { required: U256, paid: U256 },

    /// Returning the overpayment failed.
    #[error("refund of {amount} failed: {source}")]
    RefundFailed {
        amount: U256,
        #[source]
        source: TransferError,
    },

    /// Nothing has accumulated to withdraw.
    #[error("no proceeds to withdraw")]
    NothingToWithdraw,

    /// The proceeds transfer was rejected.
    #[error("withdrawal failed: {0}")]
    WithdrawalFailed(#[source] TransferError),

    /// The ownership ledger refused a write.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl MintError {
    /// Maps the error onto the coarse taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAddress
            | Self::EmptyString { .. }
            | Self::InvalidQuantity { .. }
            | Self::ZeroCapacity(_)
            | Self::Overflow
            | Self::Config(_)
            | Self::UnknownToken(_) => ErrorKind::InvalidInput,
            Self::NotOwner { .. } | Self::NotEligible { .. } => ErrorKind::NotAuthorized,
            Self::Paused
            | Self::NotPublic
            | Self::AlreadyPaused
            | Self::AlreadyUnpaused
            | Self::AlreadyPublic
            | Self::Reentrancy => ErrorKind::LifecycleViolation,
            Self::TierCapacityExceeded { .. } | Self::GlobalCapExceeded { .. } => {
                ErrorKind::CapacityExceeded
            }
            Self::NoAvailability => ErrorKind::NoAvailability,
            Self::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            Self::InsufficientPayment { .. } => ErrorKind::InsufficientPayment,
            Self::RefundFailed { .. } => ErrorKind::RefundFailed,
            Self::NothingToWithdraw | Self::WithdrawalFailed(_) => ErrorKind::WithdrawalFailed,
            Self::Ledger(_) => ErrorKind::Ledger,
        }
    }
}

// =============================================================================
// PORT ERRORS
// =============================================================================

/// Errors from the payment-custody port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The recipient refused the value.
    #[error("recipient {to} rejected the transfer")]
    Rejected { to: Address },

    /// Custody does not hold enough value.
    #[error("custody balance too low: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    /// Custody backend unreachable.
    #[error("custody unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the ownership-ledger port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Id already has an owner.
    #[error("token {0} already minted")]
    AlreadyMinted(TokenId),

    /// Mint to the zero address.
    #[error("cannot mint to the zero address")]
    ZeroRecipient,
}

// =============================================================================
// TESTS
// =============================================================================
