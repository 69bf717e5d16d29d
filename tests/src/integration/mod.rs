//! # Integration Tests
//!
//! The engine driven through its public ports only, with in-memory adapters.

pub mod invariants;
pub mod reentrancy;
pub mod sale_flows;
pub mod telemetry;
