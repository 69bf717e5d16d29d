//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic of the tiered issuance engine.
//! NO I/O, NO async, NO locking.
//!
//! - This is the **inner layer** of the hexagonal architecture.
//! - All types here are pure domain concepts.
//! - Dependencies point INWARD only (adapters depend on this, not vice versa).

pub mod allocator;
pub mod entities;
pub mod invariants;
pub mod lifecycle;
pub mod quota;
pub mod registry;
pub mod services;
pub mod settlement;
pub mod state;
pub mod value_objects;

pub use allocator::*;
pub use entities::*;
pub use invariants::*;
pub use lifecycle::*;
pub use quota::*;
pub use registry::*;
pub use services::*;
pub use settlement::*;
pub use state::*;
pub use value_objects::*;
