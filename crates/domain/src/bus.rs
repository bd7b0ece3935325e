//! Publication seam between command handlers and event consumers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::event::{DomainEvent, EventId, EventType};

/// Errors raised by an event bus backend.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// The bus could not accept events at all.
    #[error("Event bus unavailable: {0}")]
    Unavailable(String),

    /// The bus refused a specific event.
    #[error("Event {event_id} ({event_type}) rejected: {reason}")]
    Rejected {
        event_id: EventId,
        event_type: EventType,
        reason: String,
    },
}

/// Delivers domain events to their consumers.
///
/// `publish` returns once every event has been handed over, in input order.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, events: &[DomainEvent]) -> Result<(), EventBusError>;
}

/// Bus that keeps every published event in memory.
///
/// Can be switched into a failing mode to exercise publication errors.
#[derive(Clone, Default)]
pub struct RecordingEventBus {
    published: Arc<RwLock<Vec<DomainEvent>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn published(&self) -> Vec<DomainEvent> {
        self.published.read().await.clone()
    }

    pub async fn published_types(&self) -> Vec<EventType> {
        self.published
            .read()
            .await
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }
}

#[async_trait]
impl EventBus for RecordingEventBus {
    async fn publish(&self, events: &[DomainEvent]) -> Result<(), EventBusError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventBusError::Unavailable("recording bus set to fail".into()));
        }
        self.published.write().await.extend_from_slice(events);
        Ok(())
    }
}
