//! # Domain Services
//!
//! Pure helper functions shared by the domain components.
//! Deterministic, no I/O, no async.

use crate::domain::value_objects::{Hash, TokenId};
use sha3::{Digest, Keccak256};

/// Computes Keccak-256 of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let digest = Keccak256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Hash::new(bytes)
}

/// Builds the metadata pointer for an allocation.
///
/// A non-empty tier descriptor wins over the base URI. Returns None when
/// neither is set.
#[must_use]
pub fn compose_token_uri(tier_uri: &str, base_uri: &str, id: TokenId) -> Option<String> {
    let prefix = if tier_uri.is_empty() {
        base_uri
    } else {
        tier_uri
    };
    if prefix.is_empty() {
        return None;
    }
    Some(format!("{prefix}{id}.json"))
}

// =============================================================================
// TESTS
// =============================================================================
