//! Command handling infrastructure.
//!
//! Every handler runs the same pipeline:
//! 1. Load the aggregate(s) through the write repository (or create one)
//! 2. Invoke business methods; domain errors abort before anything is saved
//! 3. Save the aggregate state
//! 4. Publish the recorded events and commit them

use std::sync::Arc;

use common::{AggregateId, Clock, SystemClock};
use store::{Version, WriteRepository};
use uuid::Uuid;

use crate::aggregate::AggregateRoot;
use crate::bus::EventBus;
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::growing_unit::GrowingUnit;
use crate::location::Location;

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The aggregate that was written.
    pub aggregate_id: AggregateId,

    /// The entity the command was about (a plant id for plant commands).
    pub entity_id: Uuid,

    /// Version of the aggregate after the save.
    pub version: Version,

    /// The events that were published.
    pub events: Vec<DomainEvent>,
}

impl CommandResult {
    pub(crate) fn for_aggregate(
        aggregate_id: AggregateId,
        version: Version,
        events: Vec<DomainEvent>,
    ) -> Self {
        Self {
            aggregate_id,
            entity_id: aggregate_id.as_uuid(),
            version,
            events,
        }
    }
}

/// Dependencies shared by the command handlers.
#[derive(Clone)]
pub struct CommandContext {
    pub locations: Arc<dyn WriteRepository<Location>>,
    pub growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    pub bus: Arc<dyn EventBus>,
    pub clock: Arc<dyn Clock>,
}

impl CommandContext {
    pub fn new(
        locations: Arc<dyn WriteRepository<Location>>,
        growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
        bus: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            locations,
            growing_units,
            bus,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Saves the aggregate, moving it to its new version.
pub(crate) async fn persist<A: AggregateRoot>(
    repository: &dyn WriteRepository<A>,
    aggregate: &mut A,
) -> Result<Version, DomainError> {
    Ok(repository.save(aggregate).await?)
}

/// Publishes the pending events and commits them.
///
/// On failure the events stay pending and the already-saved state is kept.
pub(crate) async fn publish<A: AggregateRoot>(
    bus: &dyn EventBus,
    aggregate: &mut A,
) -> Result<Vec<DomainEvent>, DomainError> {
    let events = aggregate.uncommitted_events().to_vec();
    if events.is_empty() {
        return Ok(events);
    }

    if let Err(source) = bus.publish(&events).await {
        let aggregate_id = aggregate.id();
        tracing::error!(
            kind = A::KIND,
            %aggregate_id,
            pending = events.len(),
            error = %source,
            "state saved but events were not published"
        );
        metrics::counter!("domain_event_publication_failures_total").increment(1);
        return Err(DomainError::PublicationFailed {
            aggregate_id,
            source,
        });
    }

    aggregate.commit();
    metrics::counter!("domain_events_published_total").increment(events.len() as u64);
    Ok(events)
}

/// Save then publish a single aggregate.
pub(crate) async fn save_and_publish<A: AggregateRoot>(
    repository: &dyn WriteRepository<A>,
    bus: &dyn EventBus,
    aggregate: &mut A,
) -> Result<(Version, Vec<DomainEvent>), DomainError> {
    let version = persist(repository, aggregate).await?;
    let events = publish(bus, aggregate).await?;
    Ok((version, events))
}
