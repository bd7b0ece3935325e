//! Event handler contract.

use async_trait::async_trait;
use domain::{DomainEvent, EventType};

use crate::Result;

/// A consumer of domain events, typically a projector rebuilding a view.
///
/// Handlers must be idempotent: the dispatcher may deliver the same event
/// again when dead letters are redelivered.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Returns the name of this handler.
    fn name(&self) -> &'static str;

    /// Event types this handler is registered for.
    fn subscribed_to(&self) -> &'static [EventType];

    /// Handles a single event.
    async fn handle(&self, event: &DomainEvent) -> Result<()>;
}
