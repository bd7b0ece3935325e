//! Location command handlers.

use std::sync::Arc;

use common::{AggregateId, Clock};
use store::{AssertAggregateExists, Criteria, Persistable, WriteRepository};

use crate::bus::EventBus;
use crate::command::{CommandContext, CommandResult, save_and_publish};
use crate::error::DomainError;
use crate::growing_unit::GrowingUnit;

use super::{CreateLocation, DeleteLocation, Location, UpdateLocation};

/// Creates a location under a freshly generated id.
pub struct CreateLocationHandler {
    locations: Arc<dyn WriteRepository<Location>>,
    bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
}

impl CreateLocationHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            locations: Arc::clone(&ctx.locations),
            bus: Arc::clone(&ctx.bus),
            clock: Arc::clone(&ctx.clock),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: CreateLocation) -> Result<CommandResult, DomainError> {
        let mut location = Location::create(AggregateId::new(), cmd, self.clock.as_ref())?;
        let id = location.id();

        let (version, events) =
            save_and_publish(self.locations.as_ref(), self.bus.as_ref(), &mut location).await?;

        tracing::info!(%id, "location created");
        Ok(CommandResult::for_aggregate(id, version, events))
    }
}

/// Applies a partial update to an existing location.
pub struct UpdateLocationHandler {
    locations: Arc<dyn WriteRepository<Location>>,
    bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
}

impl UpdateLocationHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            locations: Arc::clone(&ctx.locations),
            bus: Arc::clone(&ctx.bus),
            clock: Arc::clone(&ctx.clock),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(id = %cmd.id))]
    pub async fn execute(&self, cmd: UpdateLocation) -> Result<CommandResult, DomainError> {
        let mut location = AssertAggregateExists::new(self.locations.as_ref())
            .execute(cmd.id)
            .await?;
        location.update(cmd.changes, self.clock.as_ref())?;

        let (version, events) =
            save_and_publish(self.locations.as_ref(), self.bus.as_ref(), &mut location).await?;
        Ok(CommandResult::for_aggregate(cmd.id, version, events))
    }
}

/// Soft-deletes a location, refusing while growing units still reference it.
pub struct DeleteLocationHandler {
    locations: Arc<dyn WriteRepository<Location>>,
    growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
}

impl DeleteLocationHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            locations: Arc::clone(&ctx.locations),
            growing_units: Arc::clone(&ctx.growing_units),
            bus: Arc::clone(&ctx.bus),
            clock: Arc::clone(&ctx.clock),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: DeleteLocation) -> Result<CommandResult, DomainError> {
        let mut location = AssertAggregateExists::new(self.locations.as_ref())
            .execute(cmd.id)
            .await?;

        let dependents = self
            .growing_units
            .find_by_criteria(&Criteria::new().where_eq("locationId", cmd.id.to_string()))
            .await?;
        location.delete(dependents.total, self.clock.as_ref())?;

        let (version, events) =
            save_and_publish(self.locations.as_ref(), self.bus.as_ref(), &mut location).await?;

        tracing::info!(id = %cmd.id, "location deleted");
        Ok(CommandResult::for_aggregate(cmd.id, version, events))
    }
}
