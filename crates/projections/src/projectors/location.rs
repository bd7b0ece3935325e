use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, EventType, Location};
use store::{ReadRepository, WriteRepository};
use tokio::sync::Mutex;

use crate::handler::EventHandler;
use crate::views::{LocationViewModel, LocationViewModelBuilder};
use crate::Result;

const SUBSCRIPTIONS: &[EventType] = &[
    EventType::LocationCreated,
    EventType::LocationUpdated,
    EventType::LocationDeleted,
];

/// Maintains [`LocationViewModel`]s.
pub struct LocationProjector {
    locations: Arc<dyn WriteRepository<Location>>,
    views: Arc<dyn ReadRepository<LocationViewModel>>,
    builder: Mutex<LocationViewModelBuilder>,
}

impl LocationProjector {
    pub fn new(
        locations: Arc<dyn WriteRepository<Location>>,
        views: Arc<dyn ReadRepository<LocationViewModel>>,
    ) -> Self {
        Self {
            locations,
            views,
            builder: Mutex::new(LocationViewModelBuilder::new()),
        }
    }
}

#[async_trait]
impl EventHandler for LocationProjector {
    fn name(&self) -> &'static str {
        "LocationProjector"
    }

    fn subscribed_to(&self) -> &'static [EventType] {
        SUBSCRIPTIONS
    }

    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type(), location_id = %event.aggregate_id()))]
    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let id = event.aggregate_id();

        match self.locations.find_by_id(id).await? {
            Some(location) => {
                let view = self
                    .builder
                    .lock()
                    .await
                    .reset()
                    .from_aggregate(&location)
                    .build()?;
                self.views.save(view).await?;
                tracing::debug!("location view saved");
            }
            None => {
                self.views.delete(id.as_uuid()).await?;
                tracing::debug!("location view removed");
            }
        }

        Ok(())
    }
}
