//! Location aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AggregateId, Clock};
use serde::{Deserialize, Serialize};
use store::{Persistable, Version};

use crate::aggregate::{AggregateRoot, EventRecorder};
use crate::event::{
    DeletedData, DomainEvent, EntityKind, EventPayload, LocationCreatedData, LocationUpdatedData,
};
use crate::value_objects::{LocationType, Name};

use super::{CreateLocation, LocationChanges, LocationError};

/// Location aggregate root.
#[derive(Debug, Clone)]
pub struct Location {
    id: AggregateId,
    name: Name,
    location_type: LocationType,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,

    /// Version for optimistic concurrency.
    version: Version,
    events: EventRecorder,
}

/// Stored form of a [`Location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPrimitives {
    pub id: AggregateId,
    pub name: Name,
    pub location_type: LocationType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

// Query methods
impl Location {
    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

// Command methods
impl Location {
    /// Creates a location and records `LocationCreated`.
    pub fn create(
        id: AggregateId,
        dto: CreateLocation,
        clock: &dyn Clock,
    ) -> Result<Self, LocationError> {
        let name = Name::new(&dto.name)?;
        let now = clock.now();

        let mut location = Self {
            id,
            name,
            location_type: dto.location_type,
            description: normalize_description(dto.description),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: Version::initial(),
            events: EventRecorder::default(),
        };

        let payload = EventPayload::LocationCreated(LocationCreatedData {
            name: location.name.to_string(),
            location_type: location.location_type,
            description: location.description.clone(),
        });
        location.record(now, payload);
        Ok(location)
    }

    /// Applies a partial update and records `LocationUpdated`.
    pub fn update(
        &mut self,
        changes: LocationChanges,
        clock: &dyn Clock,
    ) -> Result<(), LocationError> {
        self.ensure_not_deleted()?;
        let name = changes.name.as_deref().map(Name::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(location_type) = changes.location_type {
            self.location_type = location_type;
        }
        if changes.description.is_some() {
            self.description = normalize_description(changes.description);
        }

        let now = clock.now();
        self.updated_at = now;
        let payload = EventPayload::LocationUpdated(LocationUpdatedData {
            name: self.name.to_string(),
            location_type: self.location_type,
            description: self.description.clone(),
        });
        self.record(now, payload);
        Ok(())
    }

    /// Soft-deletes the location and records `LocationDeleted`.
    ///
    /// `growing_unit_count` is the number of live growing units placed here.
    pub fn delete(
        &mut self,
        growing_unit_count: usize,
        clock: &dyn Clock,
    ) -> Result<(), LocationError> {
        self.ensure_not_deleted()?;
        if growing_unit_count > 0 {
            return Err(LocationError::HasGrowingUnits {
                count: growing_unit_count,
            });
        }

        let now = clock.now();
        self.deleted_at = Some(now);
        self.updated_at = now;
        self.record(now, EventPayload::LocationDeleted(DeletedData { deleted_at: now }));
        Ok(())
    }

    fn ensure_not_deleted(&self) -> Result<(), LocationError> {
        if self.deleted_at.is_some() {
            return Err(LocationError::AlreadyDeleted);
        }
        Ok(())
    }

    fn record(&mut self, occurred_at: DateTime<Utc>, payload: EventPayload) {
        self.events.record(DomainEvent::for_aggregate(
            self.id,
            EntityKind::Location,
            occurred_at,
            payload,
        ));
    }
}

impl Persistable for Location {
    const KIND: &'static str = "Location";
    type Primitives = LocationPrimitives;

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn to_primitives(&self) -> LocationPrimitives {
        LocationPrimitives {
            id: self.id,
            name: self.name.clone(),
            location_type: self.location_type,
            description: self.description.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }

    fn from_primitives(primitives: LocationPrimitives, version: Version) -> Self {
        Self {
            id: primitives.id,
            name: primitives.name,
            location_type: primitives.location_type,
            description: primitives.description,
            created_at: primitives.created_at,
            updated_at: primitives.updated_at,
            deleted_at: primitives.deleted_at,
            version,
            events: EventRecorder::default(),
        }
    }
}

impl AggregateRoot for Location {
    fn uncommitted_events(&self) -> &[DomainEvent] {
        self.events.pending()
    }

    fn commit(&mut self) {
        self.events.clear();
    }
}
