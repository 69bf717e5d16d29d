//! # Mint Configuration
//!
//! Deployment parameters for one issuance engine.
//!
//! All values have sane defaults (the reference 1000-unit sale) with override
//! capability through `TM_*` environment variables.

use crate::domain::value_objects::{milli_ether, Address, Tier, U256};
use std::env;
use thiserror::Error;

/// Default per-tier capacities (common, rare, legendary).
pub const DEFAULT_TIER_CAPACITIES: [u64; Tier::COUNT] = [600, 300, 100];

/// Default unit price in milli-ether (0.05 ether).
pub const DEFAULT_MINT_PRICE_MILLI_ETHER: u64 = 50;

/// Default per-requester cap.
pub const DEFAULT_MAX_PER_ADDRESS: u64 = 10;

/// Default per-call cap.
pub const DEFAULT_MAX_PER_CALL: u32 = 5;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintConfig {
    /// Capacity per tier, indexed by tier id.
    pub tier_capacities: [u64; Tier::COUNT],
    /// Initial unit price (wei).
    pub mint_price: U256,
    /// Initial per-requester cap over public and allow-list paths.
    pub max_per_address: u64,
    /// Maximum units per public or privileged call.
    pub max_per_call: u32,
    /// Initial base metadata URI (may be empty).
    pub base_uri: String,
    /// Initial tier metadata URIs (may be empty).
    pub tier_uris: [String; Tier::COUNT],
    /// Initial owner.
    pub owner: Address,
    /// Start in the paused state.
    pub start_paused: bool,
    /// Make the privileged path honor the pause flag.
    pub privileged_respects_pause: bool,
}

impl Default for MintConfig {
    fn default() -> Self {
        Self {
            tier_capacities: DEFAULT_TIER_CAPACITIES,
            mint_price: milli_ether(DEFAULT_MINT_PRICE_MILLI_ETHER),
            max_per_address: DEFAULT_MAX_PER_ADDRESS,
            max_per_call: DEFAULT_MAX_PER_CALL,
            base_uri: String::new(),
            tier_uris: [String::new(), String::new(), String::new()],
            owner: Address::repeat_byte(0x01),
            start_paused: false,
            privileged_respects_pause: false,
        }
    }
}

impl MintConfig {
    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TM_TIER_CAPACITIES`: comma-separated `common,rare,legendary` (default: 600,300,100)
    /// - `TM_MINT_PRICE_WEI`: unit price in wei, decimal (default: 0.05 ether)
    /// - `TM_MAX_PER_ADDRESS`: per-requester cap (default: 10)
    /// - `TM_MAX_PER_CALL`: per-call cap (default: 5)
    /// - `TM_BASE_URI`: base metadata URI (default: empty)
    /// - `TM_OWNER`: owner address, 40 hex chars with optional `0x` (default: 0x0101..01)
    /// - `TM_START_PAUSED`: `true`/`1` to start paused (default: false)
    /// - `TM_PRIVILEGED_RESPECTS_PAUSE`: `true`/`1` to block the privileged path while paused
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(raw) = env::var("TM_TIER_CAPACITIES") {
            config.tier_capacities = parse_capacities(&raw)?;
        }
        if let Ok(raw) = env::var("TM_MINT_PRICE_WEI") {
            config.mint_price = U256::from_dec_str(raw.trim())
                .map_err(|_| ConfigError::invalid("TM_MINT_PRICE_WEI", &raw))?;
        }
        if let Ok(raw) = env::var("TM_MAX_PER_ADDRESS") {
            config.max_per_address = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("TM_MAX_PER_ADDRESS", &raw))?;
        }
        if let Ok(raw) = env::var("TM_MAX_PER_CALL") {
            config.max_per_call = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("TM_MAX_PER_CALL", &raw))?;
        }
        if let Ok(raw) = env::var("TM_BASE_URI") {
            config.base_uri = raw;
        }
        if let Ok(raw) = env::var("TM_OWNER") {
            config.owner =
                parse_address(&raw).ok_or_else(|| ConfigError::invalid("TM_OWNER", &raw))?;
        }
        config.start_paused = env_flag("TM_START_PAUSED").unwrap_or(config.start_paused);
        config.privileged_respects_pause = env_flag("TM_PRIVILEGED_RESPECTS_PAUSE")
            .unwrap_or(config.privileged_respects_pause);

        Ok(config)
    }

    /// Sum of the tier capacities.
    #[must_use]
    pub fn global_cap(&self) -> u64 {
        self.tier_capacities.iter().sum()
    }

    /// Validates the configuration before an engine is built from it.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - any tier capacity is zero
    /// - `max_per_call` or `max_per_address` is zero
    /// - `max_per_call` exceeds `max_per_address`
    /// - the owner is the zero address
    pub fn validate(&self) -> Result<(), ConfigError> {
        for tier in Tier::ALL {
            if self.tier_capacities[tier.index()] == 0 {
                return Err(ConfigError::ZeroCapacity(tier));
            }
        }
        if self.max_per_call == 0 {
            return Err(ConfigError::ZeroLimit("max_per_call"));
        }
        if self.max_per_address == 0 {
            return Err(ConfigError::ZeroLimit("max_per_address"));
        }
        if u64::from(self.max_per_call) > self.max_per_address {
            return Err(ConfigError::PerCallAboveQuota {
                per_call: self.max_per_call,
                per_address: self.max_per_address,
            });
        }
        if self.owner.is_zero() {
            return Err(ConfigError::ZeroOwner);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// A tier has zero capacity.
    #[error("tier {0} must have a positive capacity")]
    ZeroCapacity(Tier),

    /// A limit is zero.
    #[error("{0} must be positive")]
    ZeroLimit(&'static str),

    /// Per-call cap above the per-address cap.
    #[error("max_per_call {per_call} exceeds max_per_address {per_address}")]
    PerCallAboveQuota { per_call: u32, per_address: u64 },

    /// Owner is the zero address.
    #[error("owner must not be the zero address")]
    ZeroOwner,
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v.to_lowercase() == "true" || v == "1")
}

fn parse_capacities(raw: &str) -> Result<[u64; Tier::COUNT], ConfigError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != Tier::COUNT {
        return Err(ConfigError::invalid("TM_TIER_CAPACITIES", raw));
    }
    let mut capacities = [0u64; Tier::COUNT];
    for (slot, part) in capacities.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| ConfigError::invalid("TM_TIER_CAPACITIES", raw))?;
    }
    Ok(capacities)
}

/// Parses `0x`-prefixed or bare 40-char hex into an address.
#[must_use]
pub fn parse_address(raw: &str) -> Option<Address> {
    let hex = raw.trim();
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    if hex.len() != 40 {
        return None;
    }
    let mut bytes = [0u8; 20];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
    }
    Some(Address::new(bytes))
}

// =============================================================================
// TESTS
// =============================================================================
