//! # Reentrancy Guard
//!
//! Serializes every mutating entry point of one service and rejects nested
//! entry. Independent callers wait for the transaction in flight; a call made
//! from inside a transaction of the same service (for example from the refund
//! callback) fails with `Reentrancy` instead of deadlocking on the lock.
//!
//! Nesting is tracked per task with a task-local stack of guard ids, so a
//! transaction of one service may still call into a different service.

use crate::errors::MintError;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

static NEXT_GUARD_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    /// Guards entered by the current task, innermost last.
    static ENTERED: Arc<Vec<u64>>;
}

/// Transaction lock for one service.
#[derive(Debug)]
pub struct ReentrancyGuard {
    id: u64,
    lock: Mutex<()>,
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReentrancyGuard {
    /// Creates an unlocked guard with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed),
            lock: Mutex::new(()),
        }
    }

    /// Runs `transaction` once every earlier transaction has finished.
    ///
    /// The lock is released when `transaction` completes, on success and
    /// failure alike.
    ///
    /// # Errors
    /// - `Reentrancy` if the current task is already inside a transaction of
    ///   this guard
    /// - whatever `transaction` returns
    pub async fn run<T, F>(&self, transaction: F) -> Result<T, MintError>
    where
        F: Future<Output = Result<T, MintError>>,
    {
        let outer = ENTERED.try_with(Arc::clone).unwrap_or_default();
        if outer.contains(&self.id) {
            return Err(MintError::Reentrancy);
        }

        let _held = self.lock.lock().await;
        let mut entered = Vec::with_capacity(outer.len() + 1);
        entered.extend_from_slice(&outer);
        entered.push(self.id);
        ENTERED.scope(Arc::new(entered), transaction).await
    }

    /// Whether a transaction is in flight.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

// =============================================================================
// TESTS
// =============================================================================
