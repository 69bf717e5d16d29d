//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for the issuance engine.
//! These are the interfaces between the domain and the outside world.
//!
//! - **Driving Ports (Inbound)**: `MintApi`, `MintAdminApi`, `MintQueryApi`
//! - **Driven Ports (Outbound)**: `TokenLedger`, `PaymentCustody`,
//!   `EntropySource`, `EventPublisher`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
