use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{DomainEvent, EventType, GrowingUnit};
use store::{Criteria, Persistable, ReadRepository, WriteRepository};
use tokio::sync::Mutex;

use crate::handler::EventHandler;
use crate::query::FindLocationByIdHandler;
use crate::views::{GrowingUnitViewModel, GrowingUnitViewModelBuilder, LocationViewModel};
use crate::Result;

const SUBSCRIPTIONS: &[EventType] = &[
    EventType::GrowingUnitCreated,
    EventType::GrowingUnitUpdated,
    EventType::GrowingUnitDeleted,
    EventType::PlantAdded,
    EventType::PlantUpdated,
    EventType::PlantRemoved,
    EventType::PlantTransplanted,
    EventType::LocationUpdated,
];

/// Maintains [`GrowingUnitViewModel`]s, embedding the location view.
///
/// A location change re-projects every unit at that location so the
/// embedded copy never goes stale.
pub struct GrowingUnitProjector {
    growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    find_location: FindLocationByIdHandler,
    views: Arc<dyn ReadRepository<GrowingUnitViewModel>>,
    builder: Mutex<GrowingUnitViewModelBuilder>,
}

impl GrowingUnitProjector {
    pub fn new(
        growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
        location_views: Arc<dyn ReadRepository<LocationViewModel>>,
        views: Arc<dyn ReadRepository<GrowingUnitViewModel>>,
    ) -> Self {
        Self {
            growing_units,
            find_location: FindLocationByIdHandler::new(location_views),
            views,
            builder: Mutex::new(GrowingUnitViewModelBuilder::new()),
        }
    }

    async fn project(&self, id: AggregateId) -> Result<()> {
        match self.growing_units.find_by_id(id).await? {
            Some(unit) => self.save_view(&unit).await,
            None => {
                self.views.delete(id.as_uuid()).await?;
                tracing::debug!(growing_unit_id = %id, "growing unit view removed");
                Ok(())
            }
        }
    }

    async fn save_view(&self, unit: &GrowingUnit) -> Result<()> {
        let location = self
            .find_location
            .execute(unit.location_id().as_uuid())
            .await?;

        let view = self
            .builder
            .lock()
            .await
            .reset()
            .from_aggregate(unit)
            .with_location(location)
            .build()?;
        self.views.save(view).await?;
        tracing::debug!(growing_unit_id = %unit.id(), "growing unit view saved");
        Ok(())
    }

    async fn refresh_location(&self, location_id: AggregateId) -> Result<()> {
        let units = self
            .growing_units
            .find_all_by_criteria(&Criteria::new().where_eq("locationId", location_id.to_string()))
            .await?;

        tracing::debug!(%location_id, units = units.len(), "refreshing embedded location");
        for unit in &units {
            self.save_view(unit).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for GrowingUnitProjector {
    fn name(&self) -> &'static str {
        "GrowingUnitProjector"
    }

    fn subscribed_to(&self) -> &'static [EventType] {
        SUBSCRIPTIONS
    }

    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type(), aggregate_id = %event.aggregate_id()))]
    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        match event.event_type() {
            EventType::LocationUpdated => self.refresh_location(event.aggregate_id()).await,
            _ => self.project(event.aggregate_id()).await,
        }
    }
}
