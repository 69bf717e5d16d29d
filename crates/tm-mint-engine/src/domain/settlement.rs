//! # Settlement
//!
//! Exact-payment check for the public path. The refund transfer itself is
//! performed by the service through the `PaymentCustody` port.

use crate::domain::value_objects::U256;
use crate::errors::MintError;
use serde::{Deserialize, Serialize};

/// Outcome of settling one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// `unit_price * units`, retained as proceeds.
    pub cost: U256,
    /// `paid - cost`, owed back to the requester.
    pub refund: U256,
}

impl Settlement {
    /// Settlement for a free path.
    #[must_use]
    pub fn free() -> Self {
        Self {
            cost: U256::zero(),
            refund: U256::zero(),
        }
    }

    /// Whether an outbound refund transfer is needed.
    #[must_use]
    pub fn needs_refund(&self) -> bool {
        !self.refund.is_zero()
    }
}

/// Validates `paid` against `unit_price * units`.
///
/// # Errors
/// - `Overflow` if the total cost does not fit in 256 bits
/// - `InsufficientPayment` if `paid` is below the cost
pub fn settle(paid: U256, unit_price: U256, units: u32) -> Result<Settlement, MintError> {
    let cost = unit_price
        .checked_mul(U256::from(units))
        .ok_or(MintError::Overflow)?;
    if paid < cost {
        return Err(MintError::InsufficientPayment {
            required: cost,
            paid,
        });
    }
    Ok(Settlement {
        cost,
        refund: paid - cost,
    })
}

// =============================================================================
// TESTS
// =============================================================================
