//! # Custody Adapter
//!
//! In-memory payment custody. Records every payout and can be told to reject
//! transfers to chosen recipients.

use crate::domain::value_objects::{Address, U256};
use crate::errors::TransferError;
use crate::ports::outbound::PaymentCustody;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::debug;

/// One completed transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    /// Recipient.
    pub to: Address,
    /// Amount (wei).
    pub amount: U256,
}

/// In-memory custody recording payouts.
#[derive(Debug, Default)]
pub struct InMemoryCustody {
    payouts: RwLock<Vec<Payout>>,
    rejecting: RwLock<HashSet<Address>>,
}

impl InMemoryCustody {
    /// Create a custody that accepts every transfer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes transfers to `to` fail with `Rejected`.
    pub fn reject(&self, to: Address) {
        self.rejecting.write().insert(to);
    }

    /// Accepts transfers to `to` again.
    pub fn accept(&self, to: Address) {
        self.rejecting.write().remove(&to);
    }

    /// All completed payouts in order.
    #[must_use]
    pub fn payouts(&self) -> Vec<Payout> {
        self.payouts.read().clone()
    }

    /// Sum of completed payouts to `to`.
    #[must_use]
    pub fn total_paid_to(&self, to: &Address) -> U256 {
        self.payouts
            .read()
            .iter()
            .filter(|payout| payout.to == *to)
            .fold(U256::zero(), |acc, payout| acc + payout.amount)
    }
}

#[async_trait]
impl PaymentCustody for InMemoryCustody {
    async fn send_value(&self, to: Address, amount: U256) -> Result<(), TransferError> {
        if self.rejecting.read().contains(&to) {
            debug!(%to, %amount, "custody rejecting transfer");
            return Err(TransferError::Rejected { to });
        }
        self.payouts.write().push(Payout { to, amount });
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
