//! # Driven Ports (SPI - Outbound)
//!
//! The interfaces the issuance engine depends on:
//! - ownership ledger (`TokenLedger`)
//! - native value transfers (`PaymentCustody`)
//! - tier-draw seeds (`EntropySource`)
//! - event fan-out (`EventPublisher`)
//!
//! Dependencies point INWARD: adapters implement these traits.

use crate::domain::value_objects::{Address, Hash, TokenId, U256};
use crate::errors::{LedgerError, TransferError};
use crate::events::MintEvent;
use async_trait::async_trait;

// =============================================================================
// TOKEN LEDGER
// =============================================================================

/// Ownership ledger for allocated ids.
///
/// ## Implementation Notes
///
/// The engine only calls `mint` at commit time with fresh, consecutive ids
/// and a non-zero recipient, so a conforming ledger never fails those writes.
pub trait TokenLedger: Send + Sync {
    /// Records `to` as the holder of a new `id`.
    ///
    /// # Errors
    /// - `AlreadyMinted` if `id` exists
    /// - `ZeroRecipient` if `to` is zero
    fn mint(&self, to: Address, id: TokenId) -> Result<(), LedgerError>;

    /// Current holder of `id`.
    fn owner_of(&self, id: TokenId) -> Option<Address>;

    /// Ids held by `owner`, ascending.
    fn tokens_of_owner(&self, owner: &Address) -> Vec<TokenId>;

    /// Number of ids held by `owner`.
    fn balance_of(&self, owner: &Address) -> u64 {
        self.tokens_of_owner(owner).len() as u64
    }

    /// Number of ids ever minted.
    fn total_supply(&self) -> u64;
}

// =============================================================================
// PAYMENT CUSTODY
// =============================================================================

/// Releases native value held by the engine.
///
/// The recipient may run arbitrary code while receiving, including calling
/// back into the engine; the engine rejects such calls with `Reentrancy`.
#[async_trait]
pub trait PaymentCustody: Send + Sync {
    /// Sends `amount` to `to`.
    ///
    /// # Errors
    /// - `TransferError` if the recipient rejects or custody cannot pay
    async fn send_value(&self, to: Address, amount: U256) -> Result<(), TransferError>;
}

// =============================================================================
// ENTROPY SOURCE
// =============================================================================

/// Seed provider for tier draws. Called once per mint request.
pub trait EntropySource: Send + Sync {
    /// 32-byte seed for a request by `requester`.
    fn seed(&self, requester: &Address) -> Hash;
}

// =============================================================================
// EVENT PUBLISHER
// =============================================================================

/// Receives committed events in emission order.
pub trait EventPublisher: Send + Sync {
    /// Publishes one committed event.
    fn publish(&self, event: &MintEvent);
}
