//! # Entropy Adapters
//!
//! | Adapter | Source | Predictable |
//! |---------|--------|-------------|
//! | `BlockEntropy` | block number, timestamp, prevrandao | yes, by anyone who sees the block |
//! | `OsEntropy` | operating-system RNG | no |
//! | `FixedEntropy` | constant seed | yes (tests only) |

use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, Hash};
use crate::ports::outbound::EntropySource;
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;

// =============================================================================
// BLOCK ENTROPY
// =============================================================================

/// Block fields mixed into the seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Block height.
    pub number: u64,
    /// Block timestamp (seconds).
    pub timestamp: u64,
    /// Beacon randomness of the block.
    pub prevrandao: Hash,
}

/// Seed derived from the current block, as an on-chain engine would do.
///
/// NOT cryptographically unpredictable.
#[derive(Debug, Default)]
pub struct BlockEntropy {
    block: RwLock<BlockContext>,
}

impl BlockEntropy {
    /// Create a source positioned at `block`.
    #[must_use]
    pub fn new(block: BlockContext) -> Self {
        Self {
            block: RwLock::new(block),
        }
    }

    /// Moves to a new block.
    pub fn advance(&self, block: BlockContext) {
        *self.block.write() = block;
    }

    /// Current block.
    #[must_use]
    pub fn block(&self) -> BlockContext {
        *self.block.read()
    }
}

impl EntropySource for BlockEntropy {
    fn seed(&self, requester: &Address) -> Hash {
        let block = self.block();
        let mut preimage = Vec::with_capacity(8 + 8 + 32 + 20);
        preimage.extend_from_slice(&block.number.to_be_bytes());
        preimage.extend_from_slice(&block.timestamp.to_be_bytes());
        preimage.extend_from_slice(block.prevrandao.as_bytes());
        preimage.extend_from_slice(requester.as_bytes());
        keccak256(&preimage)
    }
}

// =============================================================================
// OS ENTROPY
// =============================================================================

/// Seed drawn from the operating-system RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn seed(&self, _requester: &Address) -> Hash {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Hash::new(bytes)
    }
}

// =============================================================================
// FIXED ENTROPY
// =============================================================================

/// Constant seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedEntropy(pub Hash);

impl EntropySource for FixedEntropy {
    fn seed(&self, _requester: &Address) -> Hash {
        self.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
