//! Growing unit aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AggregateId, Clock};
use serde::{Deserialize, Serialize};
use store::{Persistable, Version};

use crate::aggregate::{AggregateRoot, EventRecorder};
use crate::event::{
    DeletedData, DomainEvent, EntityKind, EventPayload, GrowingUnitCreatedData,
    GrowingUnitUpdatedData, PlantAddedData, PlantRemovedData, PlantTransplantedData,
    PlantUpdatedData,
};
use crate::value_objects::{Capacity, GrowingUnitType, Name, PlantId};

use super::{
    CreateGrowingUnit, GrowingUnitChanges, GrowingUnitError, NewPlant, Plant, PlantChanges,
};

/// Growing unit aggregate root.
///
/// Owns its plants: every plant mutation goes through the unit so the
/// capacity invariant (`plants.len() <= capacity`) always holds.
#[derive(Debug, Clone)]
pub struct GrowingUnit {
    id: AggregateId,
    location_id: AggregateId,
    name: Name,
    unit_type: GrowingUnitType,
    capacity: Capacity,
    plants: Vec<Plant>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,

    version: Version,
    events: EventRecorder,
}

/// Stored form of a [`GrowingUnit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowingUnitPrimitives {
    pub id: AggregateId,
    pub location_id: AggregateId,
    pub name: Name,
    pub unit_type: GrowingUnitType,
    pub capacity: Capacity,
    pub plants: Vec<Plant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// Query methods
impl GrowingUnit {
    pub fn location_id(&self) -> AggregateId {
        self.location_id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn unit_type(&self) -> GrowingUnitType {
        self.unit_type
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn plant(&self, plant_id: PlantId) -> Option<&Plant> {
        self.plants.iter().find(|p| p.id() == plant_id)
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.remaining_capacity(self.plants.len())
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
impl GrowingUnit {
    /// Creates an empty growing unit and records `GrowingUnitCreated`.
    pub fn create(
        id: AggregateId,
        dto: CreateGrowingUnit,
        clock: &dyn Clock,
    ) -> Result<Self, GrowingUnitError> {
        let name = Name::new(&dto.name)?;
        let capacity = Capacity::new(dto.capacity)?;
        let now = clock.now();

        let mut unit = Self {
            id,
            location_id: dto.location_id,
            name,
            unit_type: dto.unit_type,
            capacity,
            plants: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            version: Version::initial(),
            events: EventRecorder::default(),
        };

        let payload = EventPayload::GrowingUnitCreated(GrowingUnitCreatedData {
            location_id: unit.location_id,
            name: unit.name.to_string(),
            unit_type: unit.unit_type,
            capacity: unit.capacity.max(),
        });
        unit.record_own(now, payload);
        Ok(unit)
    }

    /// Applies a partial update and records `GrowingUnitUpdated`.
    pub fn update(
        &mut self,
        changes: GrowingUnitChanges,
        clock: &dyn Clock,
    ) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        let name = changes.name.as_deref().map(Name::new).transpose()?;
        let capacity = changes.capacity.map(Capacity::new).transpose()?;
        if let Some(capacity) = capacity
            && (capacity.max() as usize) < self.plants.len()
        {
            return Err(GrowingUnitError::CapacityBelowPlantCount {
                capacity: capacity.max(),
                plant_count: self.plants.len(),
            });
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(unit_type) = changes.unit_type {
            self.unit_type = unit_type;
        }
        if let Some(capacity) = capacity {
            self.capacity = capacity;
        }

        let now = clock.now();
        self.updated_at = now;
        let payload = EventPayload::GrowingUnitUpdated(GrowingUnitUpdatedData {
            name: self.name.to_string(),
            unit_type: self.unit_type,
            capacity: self.capacity.max(),
        });
        self.record_own(now, payload);
        Ok(())
    }

    /// Soft-deletes an empty growing unit and records `GrowingUnitDeleted`.
    pub fn delete(&mut self, clock: &dyn Clock) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        if !self.plants.is_empty() {
            return Err(GrowingUnitError::HasPlants {
                count: self.plants.len(),
            });
        }

        let now = clock.now();
        self.deleted_at = Some(now);
        self.updated_at = now;
        self.record_own(
            now,
            EventPayload::GrowingUnitDeleted(DeletedData { deleted_at: now }),
        );
        Ok(())
    }

    /// Adds a plant and records `PlantAdded`.
    pub fn add_plant(
        &mut self,
        plant_id: PlantId,
        data: NewPlant,
        clock: &dyn Clock,
    ) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        self.ensure_room_for_one()?;
        if self.plant(plant_id).is_some() {
            return Err(GrowingUnitError::PlantAlreadyPresent { plant_id });
        }

        let now = clock.now();
        let plant = Plant::new(plant_id, data, now)?;
        let payload = EventPayload::PlantAdded(PlantAddedData {
            plant_id,
            name: plant.name().to_string(),
            species: plant.species().map(str::to_string),
            status: plant.status(),
        });
        self.plants.push(plant);
        self.updated_at = now;
        self.record_plant(plant_id, now, payload);
        Ok(())
    }

    /// Updates one plant and records `PlantUpdated`.
    pub fn update_plant(
        &mut self,
        plant_id: PlantId,
        changes: PlantChanges,
        clock: &dyn Clock,
    ) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        let now = clock.now();
        let plant = self
            .plants
            .iter_mut()
            .find(|p| p.id() == plant_id)
            .ok_or(GrowingUnitError::PlantNotFound { plant_id })?;
        plant.apply_changes(changes, now)?;

        let payload = EventPayload::PlantUpdated(PlantUpdatedData {
            plant_id,
            name: plant.name().to_string(),
            species: plant.species().map(str::to_string),
            status: plant.status(),
            notes: plant.notes().map(str::to_string),
        });
        self.updated_at = now;
        self.record_plant(plant_id, now, payload);
        Ok(())
    }

    /// Removes a plant and records `PlantRemoved`.
    pub fn remove_plant(
        &mut self,
        plant_id: PlantId,
        clock: &dyn Clock,
    ) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        let index = self.plant_index(plant_id)?;

        let now = clock.now();
        self.plants.remove(index);
        self.updated_at = now;
        self.record_plant(
            plant_id,
            now,
            EventPayload::PlantRemoved(PlantRemovedData { plant_id }),
        );
        Ok(())
    }

    /// Receives a plant moved out of `from` and records `PlantTransplanted`.
    pub fn transplant_in(
        &mut self,
        mut plant: Plant,
        from: AggregateId,
        clock: &dyn Clock,
    ) -> Result<(), GrowingUnitError> {
        self.ensure_not_deleted()?;
        if from == self.id {
            return Err(GrowingUnitError::SameGrowingUnit);
        }
        let plant_id = plant.id();
        if self.plant(plant_id).is_some() {
            return Err(GrowingUnitError::PlantAlreadyPresent { plant_id });
        }
        self.ensure_room_for_one()?;

        let now = clock.now();
        plant.touch(now);
        self.plants.push(plant);
        self.updated_at = now;
        self.record_plant(
            plant_id,
            now,
            EventPayload::PlantTransplanted(PlantTransplantedData {
                plant_id,
                from_growing_unit_id: from,
                to_growing_unit_id: self.id,
            }),
        );
        Ok(())
    }

    /// Hands a plant over to `to` and records `PlantTransplanted`.
    pub fn transplant_out(
        &mut self,
        plant_id: PlantId,
        to: AggregateId,
        clock: &dyn Clock,
    ) -> Result<Plant, GrowingUnitError> {
        self.ensure_not_deleted()?;
        if to == self.id {
            return Err(GrowingUnitError::SameGrowingUnit);
        }
        let index = self.plant_index(plant_id)?;

        let now = clock.now();
        let plant = self.plants.remove(index);
        self.updated_at = now;
        self.record_plant(
            plant_id,
            now,
            EventPayload::PlantTransplanted(PlantTransplantedData {
                plant_id,
                from_growing_unit_id: self.id,
                to_growing_unit_id: to,
            }),
        );
        Ok(plant)
    }

    fn plant_index(&self, plant_id: PlantId) -> Result<usize, GrowingUnitError> {
        self.plants
            .iter()
            .position(|p| p.id() == plant_id)
            .ok_or(GrowingUnitError::PlantNotFound { plant_id })
    }

    fn ensure_room_for_one(&self) -> Result<(), GrowingUnitError> {
        if !self.capacity.can_add(self.plants.len(), 1) {
            return Err(GrowingUnitError::FullCapacity {
                capacity: self.capacity.max(),
            });
        }
        Ok(())
    }

    fn ensure_not_deleted(&self) -> Result<(), GrowingUnitError> {
        if self.deleted_at.is_some() {
            return Err(GrowingUnitError::AlreadyDeleted);
        }
        Ok(())
    }

    fn record_own(&mut self, occurred_at: DateTime<Utc>, payload: EventPayload) {
        self.events.record(DomainEvent::for_aggregate(
            self.id,
            EntityKind::GrowingUnit,
            occurred_at,
            payload,
        ));
    }

    fn record_plant(&mut self, plant_id: PlantId, occurred_at: DateTime<Utc>, payload: EventPayload) {
        self.events.record(DomainEvent::new(
            self.id,
            EntityKind::GrowingUnit,
            plant_id.as_uuid(),
            EntityKind::Plant,
            occurred_at,
            payload,
        ));
    }
}

impl Persistable for GrowingUnit {
    const KIND: &'static str = "GrowingUnit";
    type Primitives = GrowingUnitPrimitives;

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

    fn to_primitives(&self) -> GrowingUnitPrimitives {
        GrowingUnitPrimitives {
            id: self.id,
            location_id: self.location_id,
            name: self.name.clone(),
            unit_type: self.unit_type,
            capacity: self.capacity,
            plants: self.plants.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }

    fn from_primitives(primitives: GrowingUnitPrimitives, version: Version) -> Self {
        Self {
            id: primitives.id,
            location_id: primitives.location_id,
            name: primitives.name,
            unit_type: primitives.unit_type,
            capacity: primitives.capacity,
            plants: primitives.plants,
            created_at: primitives.created_at,
            updated_at: primitives.updated_at,
            deleted_at: primitives.deleted_at,
            version,
            events: EventRecorder::default(),
        }
    }
}

impl AggregateRoot for GrowingUnit {
    fn uncommitted_events(&self) -> &[DomainEvent] {
        self.events.pending()
    }

    fn commit(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::value_objects::PlantStatus;
    use chrono::TimeZone;
    use common::FixedClock;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 4, 1, 7, 0, 0).unwrap())
    }

    fn create_unit(capacity: u32) -> GrowingUnit {
        let mut unit = GrowingUnit::create(
            AggregateId::new(),
            CreateGrowingUnit::new(AggregateId::new(), "Herb pot", GrowingUnitType::Pot, capacity),
            &clock(),
        )
        .unwrap();
        unit.commit();
        unit
    }

    fn add(unit: &mut GrowingUnit, name: &str) -> PlantId {
        let plant_id = PlantId::new();
        unit.add_plant(plant_id, NewPlant::new(name), &clock()).unwrap();
        plant_id
    }

    fn event_types(unit: &GrowingUnit) -> Vec<EventType> {
        unit.uncommitted_events()
            .iter()
            .map(|e| e.event_type())
            .collect()
    }

    #[test]
    fn test_create() {
        let id = AggregateId::new();
        let location_id = AggregateId::new();
        let unit = GrowingUnit::create(
            id,
            CreateGrowingUnit::new(location_id, "  Bed ", GrowingUnitType::GardenBed, 4),
            &clock(),
        )
        .unwrap();

        assert_eq!(unit.capacity().max(), 4);
        assert_eq!(unit.plant_count(), 0);
        assert_eq!(event_types(&unit), vec![EventType::GrowingUnitCreated]);

        let event = &unit.uncommitted_events()[0];
        assert_eq!(event.entity_id(), id.as_uuid());
        assert_eq!(event.entity_type(), EntityKind::GrowingUnit);
        assert_eq!(
            event.payload(),
            &EventPayload::GrowingUnitCreated(GrowingUnitCreatedData {
                location_id,
                name: "Bed".to_string(),
                unit_type: GrowingUnitType::GardenBed,
                capacity: 4,
            })
        );
    }

    #[test]
    fn test_create_with_zero_capacity_fails() {
        let result = GrowingUnit::create(
            AggregateId::new(),
            CreateGrowingUnit::new(AggregateId::new(), "Bed", GrowingUnitType::GardenBed, 0),
            &clock(),
        );
        assert!(matches!(result, Err(GrowingUnitError::InvalidCapacity(_))));
    }

    #[test]
    fn test_add_plant_names_the_plant_as_entity() {
        let mut unit = create_unit(2);
        let plant_id = add(&mut unit, "Basil");

        let event = &unit.uncommitted_events()[0];
        assert_eq!(event.event_type(), EventType::PlantAdded);
        assert_eq!(event.aggregate_id(), unit.id());
        assert_eq!(event.aggregate_type(), EntityKind::GrowingUnit);
        assert_eq!(event.entity_id(), plant_id.as_uuid());
        assert_eq!(event.entity_type(), EntityKind::Plant);
        assert_eq!(unit.plant(plant_id).unwrap().status(), PlantStatus::Planted);
    }

    #[test]
    fn test_add_plant_at_full_capacity_fails() {
        let mut unit = create_unit(1);
        add(&mut unit, "Basil");
        unit.commit();

        let result = unit.add_plant(PlantId::new(), NewPlant::new("Mint"), &clock());

        assert!(matches!(result, Err(GrowingUnitError::FullCapacity { capacity: 1 })));
        assert_eq!(unit.plant_count(), 1);
        assert!(unit.uncommitted_events().is_empty());
    }

    #[test]
    fn test_add_plant_with_invalid_name_changes_nothing() {
        let mut unit = create_unit(2);
        let before = unit.to_primitives();

        let result = unit.add_plant(PlantId::new(), NewPlant::new(""), &clock());

        assert!(matches!(result, Err(GrowingUnitError::InvalidName(_))));
        assert_eq!(unit.to_primitives(), before);
        assert!(unit.uncommitted_events().is_empty());
    }

    #[test]
    fn test_update_capacity_below_plant_count_fails() {
        let mut unit = create_unit(3);
        add(&mut unit, "Basil");
        add(&mut unit, "Mint");
        unit.commit();

        let result = unit.update(
            GrowingUnitChanges {
                name: Some("Renamed".into()),
                capacity: Some(1),
                ..Default::default()
            },
            &clock(),
        );

        assert!(matches!(
            result,
            Err(GrowingUnitError::CapacityBelowPlantCount { capacity: 1, plant_count: 2 })
        ));
        assert_eq!(unit.name().as_str(), "Herb pot");
        assert_eq!(unit.capacity().max(), 3);
    }

    #[test]
    fn test_update_plant() {
        let mut unit = create_unit(2);
        let plant_id = add(&mut unit, "Basil");
        unit.commit();

        unit.update_plant(
            plant_id,
            PlantChanges {
                status: Some(PlantStatus::Growing),
                notes: Some("first leaves".into()),
                ..Default::default()
            },
            &clock(),
        )
        .unwrap();

        let plant = unit.plant(plant_id).unwrap();
        assert_eq!(plant.status(), PlantStatus::Growing);
        assert_eq!(plant.notes(), Some("first leaves"));
        assert_eq!(plant.name().as_str(), "Basil");
        assert_eq!(event_types(&unit), vec![EventType::PlantUpdated]);
    }

    #[test]
    fn test_update_missing_plant_fails() {
        let mut unit = create_unit(2);
        let result = unit.update_plant(PlantId::new(), PlantChanges::default(), &clock());
        assert!(matches!(result, Err(GrowingUnitError::PlantNotFound { .. })));
    }

    #[test]
    fn test_remove_plant() {
        let mut unit = create_unit(2);
        let plant_id = add(&mut unit, "Basil");
        unit.commit();

        unit.remove_plant(plant_id, &clock()).unwrap();

        assert!(unit.plant(plant_id).is_none());
        assert_eq!(unit.remaining_capacity(), 2);
        assert_eq!(event_types(&unit), vec![EventType::PlantRemoved]);
    }

    #[test]
    fn test_delete_with_plants_fails() {
        let mut unit = create_unit(2);
        add(&mut unit, "Basil");
        unit.commit();

        assert!(matches!(
            unit.delete(&clock()),
            Err(GrowingUnitError::HasPlants { count: 1 })
        ));
        assert!(!unit.is_deleted());
    }

    #[test]
    fn test_delete_empty_unit() {
        let mut unit = create_unit(2);
        unit.delete(&clock()).unwrap();

        assert!(unit.is_deleted());
        assert_eq!(event_types(&unit), vec![EventType::GrowingUnitDeleted]);
        assert!(matches!(
            unit.add_plant(PlantId::new(), NewPlant::new("Basil"), &clock()),
            Err(GrowingUnitError::AlreadyDeleted)
        ));
    }

    #[test]
    fn test_transplant_moves_plant_and_records_on_both_sides() {
        let mut source = create_unit(2);
        let mut target = create_unit(2);
        let plant_id = add(&mut source, "Basil");
        source.commit();

        let plant = source.plant(plant_id).unwrap().clone();
        target.transplant_in(plant, source.id(), &clock()).unwrap();
        source.transplant_out(plant_id, target.id(), &clock()).unwrap();

        assert!(source.plant(plant_id).is_none());
        assert_eq!(target.plant(plant_id).unwrap().name().as_str(), "Basil");

        for unit in [&source, &target] {
            let event = &unit.uncommitted_events()[0];
            assert_eq!(
                event.payload(),
                &EventPayload::PlantTransplanted(PlantTransplantedData {
                    plant_id,
                    from_growing_unit_id: source.id(),
                    to_growing_unit_id: target.id(),
                })
            );
        }
    }

    #[test]
    fn test_transplant_into_full_unit_fails() {
        let mut source = create_unit(2);
        let mut target = create_unit(1);
        let plant_id = add(&mut source, "Basil");
        add(&mut target, "Mint");
        target.commit();

        let plant = source.plant(plant_id).unwrap().clone();
        let result = target.transplant_in(plant, source.id(), &clock());

        assert!(matches!(result, Err(GrowingUnitError::FullCapacity { capacity: 1 })));
        assert_eq!(target.plant_count(), 1);
        assert!(target.uncommitted_events().is_empty());
    }

    #[test]
    fn test_transplant_into_same_unit_fails() {
        let mut unit = create_unit(2);
        let plant_id = add(&mut unit, "Basil");
        let id = unit.id();

        assert!(matches!(
            unit.transplant_out(plant_id, id, &clock()),
            Err(GrowingUnitError::SameGrowingUnit)
        ));
    }

    #[test]
    fn test_primitives_round_trip_without_events() {
        let mut unit = create_unit(3);
        add(&mut unit, "Basil");

        let json = serde_json::to_value(unit.to_primitives()).unwrap();
        assert_eq!(json["capacity"], 3);
        assert_eq!(json["unitType"], "POT");
        assert_eq!(json["plants"][0]["name"], "Basil");

        let restored = GrowingUnit::from_primitives(
            serde_json::from_value(json).unwrap(),
            Version::new(4),
        );
        assert_eq!(restored.to_primitives(), unit.to_primitives());
        assert!(restored.uncommitted_events().is_empty());
    }
}
