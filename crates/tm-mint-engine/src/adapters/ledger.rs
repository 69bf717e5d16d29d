//! # Ledger Adapter
//!
//! In-memory enumerable ownership ledger.

use crate::domain::value_objects::{Address, TokenId};
use crate::errors::LedgerError;
use crate::ports::outbound::TokenLedger;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default)]
struct LedgerBook {
    owners: BTreeMap<TokenId, Address>,
    holdings: HashMap<Address, BTreeSet<TokenId>>,
}

/// In-memory ledger with per-owner enumeration.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: RwLock<LedgerBook>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `id` from `from` to `to`.
    ///
    /// Returns false if `from` does not hold `id` or `to` is zero.
    pub fn transfer(&self, from: Address, to: Address, id: TokenId) -> bool {
        if to.is_zero() {
            return false;
        }
        let mut book = self.book.write();
        if book.owners.get(&id) != Some(&from) {
            return false;
        }
        book.owners.insert(id, to);
        if let Some(held) = book.holdings.get_mut(&from) {
            held.remove(&id);
        }
        book.holdings.entry(to).or_default().insert(id);
        true
    }
}

impl TokenLedger for InMemoryLedger {
    fn mint(&self, to: Address, id: TokenId) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        let mut book = self.book.write();
        if book.owners.contains_key(&id) {
            return Err(LedgerError::AlreadyMinted(id));
        }
        book.owners.insert(id, to);
        book.holdings.entry(to).or_default().insert(id);
        Ok(())
    }

    fn owner_of(&self, id: TokenId) -> Option<Address> {
        self.book.read().owners.get(&id).copied()
    }

    fn tokens_of_owner(&self, owner: &Address) -> Vec<TokenId> {
        self.book
            .read()
            .holdings
            .get(owner)
            .map(|held| held.iter().copied().collect())
            .unwrap_or_default()
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        self.book
            .read()
            .holdings
            .get(owner)
            .map_or(0, |held| held.len() as u64)
    }

    fn total_supply(&self) -> u64 {
        self.book.read().owners.len() as u64
    }
}

// =============================================================================
// TESTS
// =============================================================================
