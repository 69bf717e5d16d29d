//! # Event Log Adapter
//!
//! Publishers for committed events.

use crate::events::MintEvent;
use crate::ports::outbound::EventPublisher;
use parking_lot::RwLock;

/// Append-only in-memory event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<MintEvent>>,
}

impl InMemoryEventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All published events in order.
    #[must_use]
    pub fn events(&self) -> Vec<MintEvent> {
        self.events.read().clone()
    }

    /// Events published under `topic`.
    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Vec<MintEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.topic() == topic)
            .cloned()
            .collect()
    }

    /// Number of published events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventPublisher for InMemoryEventLog {
    fn publish(&self, event: &MintEvent) {
        self.events.write().push(event.clone());
    }
}

/// Discards events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpPublisher;

impl EventPublisher for NoOpPublisher {
    fn publish(&self, _event: &MintEvent) {}
}

// =============================================================================
// TESTS
// =============================================================================
