//! Aggregate root contract.

use store::Persistable;

use crate::event::DomainEvent;

/// An aggregate that records domain events for its own mutations.
///
/// State only changes through the aggregate's mutating methods. Each one
/// either fails without touching state or applies its change and records
/// exactly one event. Recorded events stay pending until [`commit`] is
/// called after they were published.
///
/// [`commit`]: AggregateRoot::commit
pub trait AggregateRoot: Persistable {
    /// Events recorded since the last commit, in call order.
    fn uncommitted_events(&self) -> &[DomainEvent];

    /// Clears the pending events.
    fn commit(&mut self);
}

/// Pending-event buffer embedded in every aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventRecorder {
    pending: Vec<DomainEvent>,
}

impl EventRecorder {
    pub fn record(&mut self, event: DomainEvent) {
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[DomainEvent] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
