//! Domain events recorded by the aggregates.

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{GrowingUnitType, LocationType, PlantId, PlantStatus};

/// Unique identifier of one event occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of entities that change in this domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Location,
    GrowingUnit,
    Plant,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Location => "Location",
            EntityKind::GrowingUnit => "GrowingUnit",
            EntityKind::Plant => "Plant",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type tag, used to route events to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    LocationCreated,
    LocationUpdated,
    LocationDeleted,
    GrowingUnitCreated,
    GrowingUnitUpdated,
    GrowingUnitDeleted,
    PlantAdded,
    PlantUpdated,
    PlantRemoved,
    PlantTransplanted,
}

impl EventType {
    pub const ALL: [EventType; 10] = [
        EventType::LocationCreated,
        EventType::LocationUpdated,
        EventType::LocationDeleted,
        EventType::GrowingUnitCreated,
        EventType::GrowingUnitUpdated,
        EventType::GrowingUnitDeleted,
        EventType::PlantAdded,
        EventType::PlantUpdated,
        EventType::PlantRemoved,
        EventType::PlantTransplanted,
    ];

    pub const PLANT_EVENTS: [EventType; 4] = [
        EventType::PlantAdded,
        EventType::PlantUpdated,
        EventType::PlantRemoved,
        EventType::PlantTransplanted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::LocationCreated => "LocationCreated",
            EventType::LocationUpdated => "LocationUpdated",
            EventType::LocationDeleted => "LocationDeleted",
            EventType::GrowingUnitCreated => "GrowingUnitCreated",
            EventType::GrowingUnitUpdated => "GrowingUnitUpdated",
            EventType::GrowingUnitDeleted => "GrowingUnitDeleted",
            EventType::PlantAdded => "PlantAdded",
            EventType::PlantUpdated => "PlantUpdated",
            EventType::PlantRemoved => "PlantRemoved",
            EventType::PlantTransplanted => "PlantTransplanted",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    LocationCreated(LocationCreatedData),
    LocationUpdated(LocationUpdatedData),
    LocationDeleted(DeletedData),
    GrowingUnitCreated(GrowingUnitCreatedData),
    GrowingUnitUpdated(GrowingUnitUpdatedData),
    GrowingUnitDeleted(DeletedData),
    PlantAdded(PlantAddedData),
    PlantUpdated(PlantUpdatedData),
    PlantRemoved(PlantRemovedData),
    PlantTransplanted(PlantTransplantedData),
}

impl EventPayload {
    pub fn event_type(&self) -> EventType {
        match self {
            EventPayload::LocationCreated(_) => EventType::LocationCreated,
            EventPayload::LocationUpdated(_) => EventType::LocationUpdated,
            EventPayload::LocationDeleted(_) => EventType::LocationDeleted,
            EventPayload::GrowingUnitCreated(_) => EventType::GrowingUnitCreated,
            EventPayload::GrowingUnitUpdated(_) => EventType::GrowingUnitUpdated,
            EventPayload::GrowingUnitDeleted(_) => EventType::GrowingUnitDeleted,
            EventPayload::PlantAdded(_) => EventType::PlantAdded,
            EventPayload::PlantUpdated(_) => EventType::PlantUpdated,
            EventPayload::PlantRemoved(_) => EventType::PlantRemoved,
            EventPayload::PlantTransplanted(_) => EventType::PlantTransplanted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCreatedData {
    pub name: String,
    pub location_type: LocationType,
    pub description: Option<String>,
}

/// State of the location after the update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdatedData {
    pub name: String,
    pub location_type: LocationType,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedData {
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowingUnitCreatedData {
    pub location_id: AggregateId,
    pub name: String,
    pub unit_type: GrowingUnitType,
    pub capacity: u32,
}

/// State of the growing unit after the update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowingUnitUpdatedData {
    pub name: String,
    pub unit_type: GrowingUnitType,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantAddedData {
    pub plant_id: PlantId,
    pub name: String,
    pub species: Option<String>,
    pub status: PlantStatus,
}

/// State of the plant after the update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantUpdatedData {
    pub plant_id: PlantId,
    pub name: String,
    pub species: Option<String>,
    pub status: PlantStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRemovedData {
    pub plant_id: PlantId,
}

/// Recorded on both the source and the target unit of a transplant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantTransplantedData {
    pub plant_id: PlantId,
    pub from_growing_unit_id: AggregateId,
    pub to_growing_unit_id: AggregateId,
}

/// An immutable fact about a past aggregate mutation.
///
/// `aggregate_id` names the consistency boundary that recorded the event;
/// `entity_id` names what actually changed. They differ for plant events,
/// which are recorded by the owning growing unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    event_id: EventId,
    aggregate_id: AggregateId,
    aggregate_type: EntityKind,
    entity_id: Uuid,
    entity_type: EntityKind,
    occurred_at: DateTime<Utc>,
    payload: EventPayload,
}

impl DomainEvent {
    pub fn new(
        aggregate_id: AggregateId,
        aggregate_type: EntityKind,
        entity_id: Uuid,
        entity_type: EntityKind,
        occurred_at: DateTime<Utc>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            aggregate_id,
            aggregate_type,
            entity_id,
            entity_type,
            occurred_at,
            payload,
        }
    }

    /// An event where the aggregate itself is the changed entity.
    pub fn for_aggregate(
        aggregate_id: AggregateId,
        aggregate_type: EntityKind,
        occurred_at: DateTime<Utc>,
        payload: EventPayload,
    ) -> Self {
        Self::new(
            aggregate_id,
            aggregate_type,
            aggregate_id.as_uuid(),
            aggregate_type,
            occurred_at,
            payload,
        )
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> EntityKind {
        self.aggregate_type
    }

    pub fn entity_id(&self) -> Uuid {
        self.entity_id
    }

    pub fn entity_type(&self) -> EntityKind {
        self.entity_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }
}
