//! # Tiered Mint Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── allocator_benchmarks.rs   # Tier draw and mint throughput
//! └── src/
//!     └── integration/
//!         ├── sale_flows.rs         # Full sale lifecycle across all entry points
//!         ├── reentrancy.rs         # Hostile custody callbacks
//!         ├── invariants.rs         # Randomized request sequences
//!         └── telemetry.rs          # Subscriber and metrics wiring
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tm-tests
//!
//! # By category
//! cargo test -p tm-tests integration::reentrancy::
//!
//! # Benchmarks
//! cargo bench -p tm-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
