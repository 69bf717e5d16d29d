//! # Weighted Allocator
//!
//! Picks the tier for one unit, weighted by each tier's remaining capacity.
//!
//! ## Algorithm
//!
//! 1. `total = Σ remaining(tier)`; `NoAvailability` if zero.
//! 2. `r = keccak256(seed ‖ requester ‖ nonce) mod total`.
//! 3. Walk tiers in ascending id order accumulating remaining capacity and
//!    return the first tier whose running sum exceeds `r`.
//!
//! Exhausted tiers carry zero weight, so they are never returned. Each
//! successful reservation shrinks its tier's weight before the next draw.
//!
//! ## Entropy
//!
//! The nonce is the allocation id about to be assigned, so two draws never
//! share inputs even inside one multi-unit request. The seed comes from an
//! [`EntropySource`](crate::ports::outbound::EntropySource); a block-derived
//! seed is NOT cryptographically unpredictable. Requesters who can predict
//! the seed can predict their tier.

use crate::domain::registry::TierRegistry;
use crate::domain::services::keccak256;
use crate::domain::value_objects::{Address, Hash, Tier, TokenId, U256};
use crate::errors::MintError;

/// Inputs of a single draw.
#[derive(Clone, Copy, Debug)]
pub struct DrawInput<'a> {
    /// Seed from the entropy source.
    pub seed: &'a Hash,
    /// Requester the unit is for.
    pub requester: &'a Address,
    /// Strictly increasing per draw (the id being assigned).
    pub nonce: TokenId,
}

/// Mixes a draw's inputs into a 256-bit value.
#[must_use]
pub fn mix_entropy(input: &DrawInput<'_>) -> U256 {
    let mut preimage = Vec::with_capacity(32 + 20 + 8);
    preimage.extend_from_slice(input.seed.as_bytes());
    preimage.extend_from_slice(input.requester.as_bytes());
    preimage.extend_from_slice(&input.nonce.get().to_be_bytes());
    keccak256(&preimage).to_u256()
}

/// Returns the tier owning position `r` of the cumulative weight line.
///
/// Returns None when `r` is past the total weight.
#[must_use]
pub fn select_by_weight(weights: [u64; Tier::COUNT], r: u64) -> Option<Tier> {
    let mut cumulative: u64 = 0;
    for tier in Tier::ALL {
        cumulative += weights[tier.index()];
        if r < cumulative {
            return Some(tier);
        }
    }
    None
}

/// Draws a tier for one unit from the current registry state.
///
/// Does not reserve; the caller reserves the returned tier before the next
/// draw.
///
/// # Errors
/// - `NoAvailability` if every tier is exhausted
pub fn draw_tier(registry: &TierRegistry, input: &DrawInput<'_>) -> Result<Tier, MintError> {
    let weights = registry.remaining_by_tier();
    let total = registry.total_remaining();
    if total == 0 {
        return Err(MintError::NoAvailability);
    }

    let r = (mix_entropy(input) % U256::from(total)).low_u64();
    select_by_weight(weights, r).ok_or(MintError::NoAvailability)
}

// =============================================================================
// TESTS
// =============================================================================
