//! Integration tests for the command side.
//!
//! These tests run commands through the bus against in-memory stores and
//! verify persistence, publication order and failure atomicity.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use common::{AggregateId, FixedClock};
use domain::{
    AddPlant, AggregateRoot, Command, CommandBus, CommandContext, CreateGrowingUnit,
    CreateLocation, DeleteGrowingUnit, DeleteLocation, DomainError, EventPayload, EventType,
    GrowingUnit, GrowingUnitChanges, GrowingUnitCreatedData, GrowingUnitType, Location,
    LocationChanges, LocationCreatedData, LocationType, NewPlant, PlantChanges, PlantId,
    PlantStatus, RecordingEventBus, RemovePlant, TransplantPlant, UpdateGrowingUnit,
    UpdateLocation, UpdatePlant,
};
use store::{
    Criteria, InMemoryWriteRepository, PaginatedResult, Persistable, StoreError, Version,
    WriteRepository,
};

struct Harness {
    locations: InMemoryWriteRepository<Location>,
    growing_units: InMemoryWriteRepository<GrowingUnit>,
    bus: RecordingEventBus,
    commands: CommandBus,
}

/// Growing-unit store whose saves fail for one chosen unit.
#[derive(Clone, Default)]
struct FailingSaves {
    inner: InMemoryWriteRepository<GrowingUnit>,
    failing: Arc<tokio::sync::RwLock<Option<AggregateId>>>,
}

impl FailingSaves {
    async fn fail_saves_for(&self, id: AggregateId) {
        *self.failing.write().await = Some(id);
    }
}

#[async_trait::async_trait]
impl WriteRepository<GrowingUnit> for FailingSaves {
    async fn find_by_id(&self, id: AggregateId) -> store::Result<Option<GrowingUnit>> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, aggregate: &mut GrowingUnit) -> store::Result<Version> {
        if *self.failing.read().await == Some(aggregate.id()) {
            return Err(StoreError::Unavailable("disk full".into()));
        }
        self.inner.save(aggregate).await
    }

    async fn delete(&self, id: AggregateId) -> store::Result<()> {
        self.inner.delete(id).await
    }

    async fn find_by_criteria(
        &self,
        criteria: &Criteria,
    ) -> store::Result<PaginatedResult<GrowingUnit>> {
        self.inner.find_by_criteria(criteria).await
    }

    async fn find_all_by_criteria(&self, criteria: &Criteria) -> store::Result<Vec<GrowingUnit>> {
        self.inner.find_all_by_criteria(criteria).await
    }
}

fn harness() -> Harness {
    harness_with(FailingSaves::default())
}

fn harness_with(units: FailingSaves) -> Harness {
    let locations = InMemoryWriteRepository::<Location>::new();
    let growing_units = units.inner.clone();
    let bus = RecordingEventBus::new();
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap());

    let ctx = CommandContext::new(
        Arc::new(locations.clone()),
        Arc::new(units),
        Arc::new(bus.clone()),
    )
    .with_clock(Arc::new(clock));

    Harness {
        locations,
        growing_units,
        bus,
        commands: CommandBus::new(&ctx),
    }
}

impl Harness {
    async fn create_location(&self, name: &str) -> AggregateId {
        self.commands
            .execute(Command::CreateLocation(CreateLocation::new(
                name,
                LocationType::Room,
            )))
            .await
            .unwrap()
            .aggregate_id
    }

    async fn create_unit(&self, location_id: AggregateId, capacity: u32) -> AggregateId {
        self.commands
            .execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
                location_id,
                "Pot",
                GrowingUnitType::Pot,
                capacity,
            )))
            .await
            .unwrap()
            .aggregate_id
    }

    async fn add_plant(&self, unit_id: AggregateId, name: &str) -> PlantId {
        let result = self
            .commands
            .execute(Command::AddPlant(AddPlant::new(unit_id, NewPlant::new(name))))
            .await
            .unwrap();
        PlantId::from_uuid(result.entity_id)
    }

    async fn unit(&self, id: AggregateId) -> GrowingUnit {
        self.growing_units.find_by_id(id).await.unwrap().unwrap()
    }
}

mod locations {
    use super::*;

    #[tokio::test]
    async fn create_saves_then_publishes() {
        let h = harness();

        let result = h
            .commands
            .execute(Command::CreateLocation(
                CreateLocation::new("Kitchen", LocationType::Room).with_description("sunny"),
            ))
            .await
            .unwrap();

        assert_eq!(result.version, Version::first());
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.entity_id, result.aggregate_id.as_uuid());

        let stored = h.locations.find_by_id(result.aggregate_id).await.unwrap().unwrap();
        assert_eq!(stored.name().as_str(), "Kitchen");
        assert!(stored.uncommitted_events().is_empty());

        assert_eq!(h.bus.published_types().await, vec![EventType::LocationCreated]);

        let event = &result.events[0];
        assert_eq!(event.entity_id(), result.aggregate_id.as_uuid());
        assert_eq!(
            event.payload(),
            &EventPayload::LocationCreated(LocationCreatedData {
                name: "Kitchen".to_string(),
                location_type: LocationType::Room,
                description: Some("sunny".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn update_unknown_location_is_not_found() {
        let h = harness();
        let id = AggregateId::new();

        let err = h
            .commands
            .execute(Command::UpdateLocation(UpdateLocation::new(
                id,
                LocationChanges::default(),
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NOT_FOUND");
        assert!(err.to_string().contains(&id.to_string()));
        assert!(err.to_string().contains("Location"));
    }

    #[tokio::test]
    async fn invalid_update_writes_and_publishes_nothing() {
        let h = harness();
        let id = h.create_location("Kitchen").await;

        let err = h
            .commands
            .execute(Command::UpdateLocation(UpdateLocation::new(
                id,
                LocationChanges {
                    name: Some("  ".into()),
                    ..Default::default()
                },
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_NAME");
        let stored = h.locations.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.version(), Version::first());
        assert_eq!(h.bus.published().await.len(), 1);
    }

    #[tokio::test]
    async fn delete_with_growing_units_is_rejected() {
        let h = harness();
        let location_id = h.create_location("Kitchen").await;
        h.create_unit(location_id, 2).await;

        let err = h
            .commands
            .execute(Command::DeleteLocation(DeleteLocation::new(location_id)))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "LOCATION_HAS_GROWING_UNITS");
        assert!(h.locations.find_by_id(location_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_is_soft_and_hides_the_location() {
        let h = harness();
        let location_id = h.create_location("Kitchen").await;

        h.commands
            .execute(Command::DeleteLocation(DeleteLocation::new(location_id)))
            .await
            .unwrap();

        assert!(h.locations.find_by_id(location_id).await.unwrap().is_none());
        assert!(h.locations.document(location_id).await.unwrap().deleted);

        // deleted locations no longer accept growing units
        let err = h
            .commands
            .execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
                location_id,
                "Pot",
                GrowingUnitType::Pot,
                1,
            )))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn delete_after_units_are_gone() {
        let h = harness();
        let location_id = h.create_location("Kitchen").await;
        let unit_id = h.create_unit(location_id, 2).await;

        h.commands
            .execute(Command::DeleteGrowingUnit(DeleteGrowingUnit::new(unit_id)))
            .await
            .unwrap();
        h.commands
            .execute(Command::DeleteLocation(DeleteLocation::new(location_id)))
            .await
            .unwrap();

        assert!(h.locations.find_by_id(location_id).await.unwrap().is_none());
    }
}

mod growing_units {
    use super::*;

    #[tokio::test]
    async fn create_requires_existing_location() {
        let h = harness();

        let err = h
            .commands
            .execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
                AggregateId::new(),
                "Pot",
                GrowingUnitType::Pot,
                2,
            )))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { kind: "Location", .. }));
        assert_eq!(h.growing_units.document_count().await, 0);
        assert!(h.bus.published().await.is_empty());
    }

    #[tokio::test]
    async fn create_event_carries_the_command_input() {
        let h = harness();
        let location_id = h.create_location("Shed").await;

        let result = h
            .commands
            .execute(Command::CreateGrowingUnit(CreateGrowingUnit::new(
                location_id,
                "Seed tray",
                GrowingUnitType::WindowBox,
                6,
            )))
            .await
            .unwrap();

        assert_eq!(result.events.len(), 1);
        let event = &result.events[0];
        assert_eq!(event.aggregate_id(), result.aggregate_id);
        assert_eq!(event.entity_id(), result.aggregate_id.as_uuid());
        assert_eq!(
            event.payload(),
            &EventPayload::GrowingUnitCreated(GrowingUnitCreatedData {
                location_id,
                name: "Seed tray".to_string(),
                unit_type: GrowingUnitType::WindowBox,
                capacity: 6,
            })
        );

        let stored = h.unit(result.aggregate_id).await;
        assert_eq!(stored.location_id(), location_id);
        assert_eq!(stored.capacity().max(), 6);
    }

    #[tokio::test]
    async fn plant_lifecycle() {
        let h = harness();
        let location_id = h.create_location("Greenhouse").await;
        let unit_id = h.create_unit(location_id, 3).await;
        let plant_id = h.add_plant(unit_id, "Tomato").await;

        h.commands
            .execute(Command::UpdatePlant(UpdatePlant::new(
                unit_id,
                plant_id,
                PlantChanges {
                    status: Some(PlantStatus::Growing),
                    ..Default::default()
                },
            )))
            .await
            .unwrap();
        assert_eq!(
            h.unit(unit_id).await.plant(plant_id).unwrap().status(),
            PlantStatus::Growing
        );

        let result = h
            .commands
            .execute(Command::RemovePlant(RemovePlant::new(unit_id, plant_id)))
            .await
            .unwrap();
        assert_eq!(result.entity_id, plant_id.as_uuid());
        assert_eq!(result.version, Version::new(4));
        assert_eq!(h.unit(unit_id).await.plant_count(), 0);

        assert_eq!(
            h.bus.published_types().await,
            vec![
                EventType::LocationCreated,
                EventType::GrowingUnitCreated,
                EventType::PlantAdded,
                EventType::PlantUpdated,
                EventType::PlantRemoved,
            ]
        );
    }

    #[tokio::test]
    async fn full_capacity_rejects_new_plants() {
        let h = harness();
        let location_id = h.create_location("Balcony").await;
        let unit_id = h.create_unit(location_id, 1).await;
        h.add_plant(unit_id, "Basil").await;

        let err = h
            .commands
            .execute(Command::AddPlant(AddPlant::new(unit_id, NewPlant::new("Mint"))))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "GROWING_UNIT_FULL_CAPACITY");
        assert_eq!(h.unit(unit_id).await.plant_count(), 1);
    }

    #[tokio::test]
    async fn capacity_cannot_drop_below_plant_count() {
        let h = harness();
        let location_id = h.create_location("Balcony").await;
        let unit_id = h.create_unit(location_id, 3).await;
        h.add_plant(unit_id, "Basil").await;
        h.add_plant(unit_id, "Mint").await;

        let err = h
            .commands
            .execute(Command::UpdateGrowingUnit(UpdateGrowingUnit::new(
                unit_id,
                GrowingUnitChanges {
                    capacity: Some(1),
                    ..Default::default()
                },
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "GROWING_UNIT_CAPACITY_BELOW_PLANT_COUNT");
    }

    #[tokio::test]
    async fn delete_with_plants_is_rejected() {
        let h = harness();
        let location_id = h.create_location("Balcony").await;
        let unit_id = h.create_unit(location_id, 3).await;
        h.add_plant(unit_id, "Basil").await;

        let err = h
            .commands
            .execute(Command::DeleteGrowingUnit(DeleteGrowingUnit::new(unit_id)))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "GROWING_UNIT_HAS_PLANTS");
    }
}

mod transplant {
    use super::*;

    #[tokio::test]
    async fn moves_plant_and_publishes_source_first() {
        let h = harness();
        let location_id = h.create_location("Garden").await;
        let source_id = h.create_unit(location_id, 2).await;
        let target_id = h.create_unit(location_id, 2).await;
        let plant_id = h.add_plant(source_id, "Pepper").await;
        let published_before = h.bus.published().await.len();

        let result = h
            .commands
            .execute(Command::TransplantPlant(TransplantPlant::new(
                plant_id, source_id, target_id,
            )))
            .await
            .unwrap();

        assert_eq!(result.aggregate_id, target_id);
        assert!(h.unit(source_id).await.plant(plant_id).is_none());
        assert!(h.unit(target_id).await.plant(plant_id).is_some());

        let published = h.bus.published().await;
        let new_events = &published[published_before..];
        assert_eq!(new_events.len(), 2);
        assert_eq!(new_events[0].aggregate_id(), source_id);
        assert_eq!(new_events[1].aggregate_id(), target_id);
        assert!(
            new_events
                .iter()
                .all(|e| e.event_type() == EventType::PlantTransplanted)
        );
    }

    #[tokio::test]
    async fn full_target_leaves_both_units_unchanged() {
        let h = harness();
        let location_id = h.create_location("Garden").await;
        let source_id = h.create_unit(location_id, 2).await;
        let target_id = h.create_unit(location_id, 1).await;
        let plant_id = h.add_plant(source_id, "Pepper").await;
        h.add_plant(target_id, "Chili").await;

        let source_before = h.unit(source_id).await.to_primitives();
        let target_before = h.unit(target_id).await.to_primitives();
        let published_before = h.bus.published().await.len();

        let err = h
            .commands
            .execute(Command::TransplantPlant(TransplantPlant::new(
                plant_id, source_id, target_id,
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "GROWING_UNIT_FULL_CAPACITY");
        assert_eq!(h.unit(source_id).await.to_primitives(), source_before);
        assert_eq!(h.unit(target_id).await.to_primitives(), target_before);
        assert_eq!(h.bus.published().await.len(), published_before);
    }

    #[tokio::test]
    async fn failed_target_save_keeps_plant_in_source() {
        let units = FailingSaves::default();
        let h = harness_with(units.clone());
        let location_id = h.create_location("Garden").await;
        let source_id = h.create_unit(location_id, 2).await;
        let target_id = h.create_unit(location_id, 2).await;
        let plant_id = h.add_plant(source_id, "Pepper").await;
        let source_before = h.unit(source_id).await.to_primitives();
        let published_before = h.bus.published().await.len();

        units.fail_saves_for(target_id).await;
        let err = h
            .commands
            .execute(Command::TransplantPlant(TransplantPlant::new(
                plant_id, source_id, target_id,
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "STORE_UNAVAILABLE");
        assert_eq!(h.unit(source_id).await.to_primitives(), source_before);
        assert!(h.unit(target_id).await.plant(plant_id).is_none());
        assert_eq!(h.bus.published().await.len(), published_before);
    }

    #[tokio::test]
    async fn failed_source_save_rolls_back_target() {
        let units = FailingSaves::default();
        let h = harness_with(units.clone());
        let location_id = h.create_location("Garden").await;
        let source_id = h.create_unit(location_id, 2).await;
        let target_id = h.create_unit(location_id, 2).await;
        let plant_id = h.add_plant(source_id, "Pepper").await;
        let target_before = h.unit(target_id).await.to_primitives();
        let published_before = h.bus.published().await.len();

        units.fail_saves_for(source_id).await;
        let err = h
            .commands
            .execute(Command::TransplantPlant(TransplantPlant::new(
                plant_id, source_id, target_id,
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "STORE_UNAVAILABLE");
        assert!(h.unit(source_id).await.plant(plant_id).is_some());
        assert_eq!(h.unit(target_id).await.to_primitives(), target_before);
        assert_eq!(h.bus.published().await.len(), published_before);
    }

    #[tokio::test]
    async fn same_unit_is_rejected() {
        let h = harness();
        let location_id = h.create_location("Garden").await;
        let unit_id = h.create_unit(location_id, 2).await;
        let plant_id = h.add_plant(unit_id, "Pepper").await;

        let err = h
            .commands
            .execute(Command::TransplantPlant(TransplantPlant::new(
                plant_id, unit_id, unit_id,
            )))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TRANSPLANT_SAME_GROWING_UNIT");
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn publication_failure_keeps_saved_state() {
        let h = harness();
        h.bus.set_failing(true);

        let err = h
            .commands
            .execute(Command::CreateLocation(CreateLocation::new(
                "Attic",
                LocationType::Room,
            )))
            .await
            .unwrap_err();

        let DomainError::PublicationFailed { aggregate_id, .. } = err else {
            panic!("expected a publication failure");
        };
        assert!(h.locations.find_by_id(aggregate_id).await.unwrap().is_some());
        assert!(h.bus.published().await.is_empty());
    }

    #[tokio::test]
    async fn stale_writer_gets_a_conflict() {
        let h = harness();
        let id = h.create_location("Kitchen").await;

        let mut stale = h.locations.find_by_id(id).await.unwrap().unwrap();

        h.commands
            .execute(Command::UpdateLocation(UpdateLocation::new(
                id,
                LocationChanges {
                    name: Some("Pantry".into()),
                    ..Default::default()
                },
            )))
            .await
            .unwrap();

        let clock = FixedClock(Utc::now());
        stale
            .update(
                LocationChanges {
                    name: Some("Cellar".into()),
                    ..Default::default()
                },
                &clock,
            )
            .unwrap();
        let err: DomainError = h.locations.save(&mut stale).await.unwrap_err().into();

        assert_eq!(err.code(), "CONCURRENCY_CONFLICT");
        let stored = h.locations.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.name().as_str(), "Pantry");
    }
}
