//! In-process event dispatcher with a dead-letter log.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{DomainEvent, EventBus, EventBusError, EventType};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::handler::EventHandler;

/// An event a handler failed to process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadLetter {
    pub id: Uuid,
    pub handler: &'static str,
    pub event: DomainEvent,
    pub error: String,
    pub attempts: u32,
    pub first_failed_at: DateTime<Utc>,
    pub last_failed_at: DateTime<Utc>,
}

/// Number of dead letters kept when no capacity is given.
pub const DEFAULT_DEAD_LETTER_CAPACITY: usize = 1_000;

/// Shared list of failed deliveries awaiting manual redelivery.
///
/// The log is bounded: once it holds `capacity` letters, each new one evicts
/// the oldest.
#[derive(Clone)]
pub struct DeadLetterLog {
    entries: Arc<RwLock<VecDeque<DeadLetter>>>,
    capacity: usize,
}

impl Default for DeadLetterLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_DEAD_LETTER_CAPACITY)
    }
}

impl DeadLetterLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log keeping at most `capacity` letters (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn push(&self, letter: DeadLetter) {
        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            if let Some(evicted) = entries.pop_front() {
                tracing::warn!(
                    handler = evicted.handler,
                    event_id = %evicted.event.event_id(),
                    attempts = evicted.attempts,
                    "dead letter log full, dropping oldest letter"
                );
                metrics::counter!("dead_letters_evicted_total").increment(1);
            }
        }
        entries.push_back(letter);
    }

    pub async fn list(&self) -> Vec<DeadLetter> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Discards every letter, returning how many were dropped.
    pub async fn purge(&self) -> usize {
        let purged = self.take_all().await.len();
        if purged > 0 {
            tracing::info!(purged, "dead letter log purged");
        }
        purged
    }

    async fn take_all(&self) -> Vec<DeadLetter> {
        std::mem::take(&mut *self.entries.write().await).into()
    }
}

/// Outcome of a redelivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeliveryReport {
    pub redelivered: usize,
    pub still_failing: usize,
}

/// Routes published events to every handler subscribed to their type.
///
/// Delivery is synchronous: `dispatch` returns after every handler has run.
/// Handlers run in registration order, events in input order. A failing
/// handler does not stop delivery to the others and never fails the
/// publisher; the failure is logged, counted and appended to the
/// dead-letter log. Nothing is retried automatically.
#[derive(Default)]
pub struct EventDispatcher {
    routes: HashMap<EventType, Vec<Arc<dyn EventHandler>>>,
    dead_letters: DeadLetterLog,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose dead-letter log keeps at most `capacity` letters.
    pub fn with_dead_letter_capacity(capacity: usize) -> Self {
        Self {
            routes: HashMap::new(),
            dead_letters: DeadLetterLog::with_capacity(capacity),
        }
    }

    /// Registers a handler for one event type.
    pub fn subscribe(&mut self, event_type: EventType, handler: Arc<dyn EventHandler>) {
        tracing::debug!(%event_type, handler = handler.name(), "handler subscribed");
        self.routes.entry(event_type).or_default().push(handler);
    }

    /// Registers a handler for every type it declares.
    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        for event_type in handler.subscribed_to() {
            self.subscribe(*event_type, Arc::clone(&handler));
        }
    }

    /// Returns the number of handlers registered for an event type.
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.routes.get(&event_type).map_or(0, Vec::len)
    }

    pub fn dead_letters(&self) -> &DeadLetterLog {
        &self.dead_letters
    }

    /// Delivers each event to its handlers.
    #[tracing::instrument(skip(self, events), fields(events = events.len()))]
    pub async fn dispatch(&self, events: &[DomainEvent]) {
        for event in events {
            let Some(handlers) = self.routes.get(&event.event_type()) else {
                tracing::trace!(event_type = %event.event_type(), "no handlers registered");
                continue;
            };

            for handler in handlers {
                if let Err(error) = self.deliver(handler.as_ref(), event).await {
                    let now = Utc::now();
                    self.dead_letters
                        .push(DeadLetter {
                            id: Uuid::new_v4(),
                            handler: handler.name(),
                            event: event.clone(),
                            error,
                            attempts: 1,
                            first_failed_at: now,
                            last_failed_at: now,
                        })
                        .await;
                }
            }
        }
    }

    /// Redelivers every dead letter to the handler that failed it.
    ///
    /// Letters that fail again go back to the log with their attempt count
    /// bumped.
    #[tracing::instrument(skip(self))]
    pub async fn redeliver_dead_letters(&self) -> RedeliveryReport {
        let mut report = RedeliveryReport::default();

        for mut letter in self.dead_letters.take_all().await {
            let handler = self
                .routes
                .get(&letter.event.event_type())
                .and_then(|handlers| handlers.iter().find(|h| h.name() == letter.handler));

            let Some(handler) = handler else {
                tracing::warn!(handler = letter.handler, "dead letter handler no longer registered");
                report.still_failing += 1;
                self.dead_letters.push(letter).await;
                continue;
            };

            match self.deliver(handler.as_ref(), &letter.event).await {
                Ok(()) => report.redelivered += 1,
                Err(error) => {
                    letter.attempts += 1;
                    letter.error = error;
                    letter.last_failed_at = Utc::now();
                    report.still_failing += 1;
                    self.dead_letters.push(letter).await;
                }
            }
        }

        tracing::info!(
            redelivered = report.redelivered,
            still_failing = report.still_failing,
            "dead letter redelivery complete"
        );
        report
    }

    async fn deliver(&self, handler: &dyn EventHandler, event: &DomainEvent) -> Result<(), String> {
        match handler.handle(event).await {
            Ok(()) => {
                metrics::counter!("projection_events_handled_total", "handler" => handler.name())
                    .increment(1);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    handler = handler.name(),
                    event_id = %event.event_id(),
                    event_type = %event.event_type(),
                    aggregate_id = %event.aggregate_id(),
                    error = %e,
                    "projection failed"
                );
                metrics::counter!("projection_failures_total", "handler" => handler.name())
                    .increment(1);
                Err(e.to_string())
            }
        }
    }
}

#[async_trait]
impl EventBus for EventDispatcher {
    async fn publish(&self, events: &[DomainEvent]) -> Result<(), EventBusError> {
        self.dispatch(events).await;
        Ok(())
    }
}
