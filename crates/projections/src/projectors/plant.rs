use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{DomainEvent, EventType, GrowingUnit, Plant, PlantId};
use store::{Criteria, ReadRepository, WriteRepository};
use tokio::sync::Mutex;

use crate::handler::EventHandler;
use crate::views::{LocationViewModel, PlantViewModel, PlantViewModelBuilder};
use crate::Result;

const SUBSCRIPTIONS: &[EventType] = &[
    EventType::PlantAdded,
    EventType::PlantUpdated,
    EventType::PlantRemoved,
    EventType::PlantTransplanted,
    EventType::GrowingUnitUpdated,
    EventType::LocationUpdated,
];

/// Maintains one [`PlantViewModel`] per plant.
///
/// Plant events carry the unit as aggregate and the plant as entity. If the
/// unit no longer holds the plant, the view is dropped only when it still
/// points at that unit, so the two halves of a transplant may arrive in
/// either order.
pub struct PlantProjector {
    growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    locations: Arc<dyn ReadRepository<LocationViewModel>>,
    views: Arc<dyn ReadRepository<PlantViewModel>>,
    builder: Mutex<PlantViewModelBuilder>,
}

impl PlantProjector {
    pub fn new(
        growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
        locations: Arc<dyn ReadRepository<LocationViewModel>>,
        views: Arc<dyn ReadRepository<PlantViewModel>>,
    ) -> Self {
        Self {
            growing_units,
            locations,
            views,
            builder: Mutex::new(PlantViewModelBuilder::new()),
        }
    }

    async fn project_plant(&self, unit_id: AggregateId, plant_id: PlantId) -> Result<()> {
        let unit = self.growing_units.find_by_id(unit_id).await?;

        if let Some(unit) = &unit {
            if let Some(plant) = unit.plant(plant_id) {
                return self.save_view(unit, plant).await;
            }
        }

        let stale = self
            .views
            .find_by_id(plant_id.as_uuid())
            .await?
            .is_some_and(|view| view.growing_unit_id() == unit_id.as_uuid());
        if stale {
            self.views.delete(plant_id.as_uuid()).await?;
            tracing::debug!(%plant_id, growing_unit_id = %unit_id, "plant view removed");
        }
        Ok(())
    }

    async fn project_unit(&self, unit: &GrowingUnit) -> Result<()> {
        for plant in unit.plants() {
            self.save_view(unit, plant).await?;
        }
        Ok(())
    }

    async fn save_view(&self, unit: &GrowingUnit, plant: &Plant) -> Result<()> {
        let location = self
            .locations
            .find_by_id(unit.location_id().as_uuid())
            .await?;

        let view = self
            .builder
            .lock()
            .await
            .reset()
            .from_plant(plant)
            .with_growing_unit(unit)
            .with_location(location.as_ref())
            .build()?;
        self.views.save(view).await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for PlantProjector {
    fn name(&self) -> &'static str {
        "PlantProjector"
    }

    fn subscribed_to(&self) -> &'static [EventType] {
        SUBSCRIPTIONS
    }

    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type(), aggregate_id = %event.aggregate_id()))]
    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        match event.event_type() {
            EventType::GrowingUnitUpdated => {
                if let Some(unit) = self.growing_units.find_by_id(event.aggregate_id()).await? {
                    self.project_unit(&unit).await?;
                }
                Ok(())
            }
            EventType::LocationUpdated => {
                let criteria =
                    Criteria::new().where_eq("locationId", event.aggregate_id().to_string());
                for unit in self.growing_units.find_all_by_criteria(&criteria).await? {
                    self.project_unit(&unit).await?;
                }
                Ok(())
            }
            _ => {
                let plant_id = PlantId::from_uuid(event.entity_id());
                self.project_plant(event.aggregate_id(), plant_id).await
            }
        }
    }
}
