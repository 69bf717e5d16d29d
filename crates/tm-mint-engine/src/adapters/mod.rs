//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports.
//!
//! - `InMemoryLedger` implements `TokenLedger`
//! - `InMemoryCustody` implements `PaymentCustody`
//! - `BlockEntropy`, `OsEntropy`, `FixedEntropy` implement `EntropySource`
//! - `InMemoryEventLog`, `NoOpPublisher` implement `EventPublisher`

pub mod custody;
pub mod entropy;
pub mod event_log;
pub mod ledger;

pub use custody::*;
pub use entropy::*;
pub use event_log::*;
pub use ledger::*;
