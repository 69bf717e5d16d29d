//! # Lifecycle Gate
//!
//! Paused/Live × Private/Public state machine gating the entry points.
//!
//! ```text
//!            pause()                 go_public()
//!   Live  ───────────▶ Paused     Private ───────────▶ Public
//!         ◀───────────                    (no way back)
//!            unpause()
//! ```
//!
//! Repeating a transition from the state it leads to is rejected rather than
//! silently ignored.

use crate::errors::MintError;
use serde::{Deserialize, Serialize};

/// Lifecycle flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleGate {
    paused: bool,
    public_live: bool,
}

impl LifecycleGate {
    /// Creates a private gate, optionally paused.
    #[must_use]
    pub const fn new(paused: bool) -> Self {
        Self {
            paused,
            public_live: false,
        }
    }

    /// Whether entry points are blocked.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the public latch is set.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public_live
    }

    /// Live -> Paused.
    ///
    /// # Errors
    /// - `AlreadyPaused` if already paused
    pub fn pause(&mut self) -> Result<(), MintError> {
        if self.paused {
            return Err(MintError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    /// Paused -> Live.
    ///
    /// # Errors
    /// - `AlreadyUnpaused` if already live
    pub fn unpause(&mut self) -> Result<(), MintError> {
        if !self.paused {
            return Err(MintError::AlreadyUnpaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Private -> Public. One way.
    ///
    /// # Errors
    /// - `AlreadyPublic` if the latch is already set
    pub fn go_public(&mut self) -> Result<(), MintError> {
        if self.public_live {
            return Err(MintError::AlreadyPublic);
        }
        self.public_live = true;
        Ok(())
    }

    /// # Errors
    /// - `Paused` while paused
    pub fn require_live(&self) -> Result<(), MintError> {
        if self.paused {
            return Err(MintError::Paused);
        }
        Ok(())
    }

    /// Live and public, as required by the public entry point.
    ///
    /// # Errors
    /// - `Paused` while paused
    /// - `NotPublic` before `go_public`
    pub fn require_public_live(&self) -> Result<(), MintError> {
        self.require_live()?;
        if !self.public_live {
            return Err(MintError::NotPublic);
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
