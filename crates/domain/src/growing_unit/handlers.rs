//! Growing unit and plant command handlers.

use std::sync::Arc;

use common::{AggregateId, Clock};
use store::{AssertAggregateExists, Persistable, Version, WriteRepository};

use crate::bus::EventBus;
use crate::command::{CommandContext, CommandResult, persist, publish, save_and_publish};
use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::location::Location;
use crate::value_objects::PlantId;

use super::{
    AddPlant, CreateGrowingUnit, DeleteGrowingUnit, GrowingUnit, GrowingUnitError, RemovePlant,
    TransplantPlant, UpdateGrowingUnit, UpdatePlant,
};

/// Dependencies every growing-unit handler needs.
#[derive(Clone)]
struct UnitDeps {
    growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    bus: Arc<dyn EventBus>,
    clock: Arc<dyn Clock>,
}

impl UnitDeps {
    fn new(ctx: &CommandContext) -> Self {
        Self {
            growing_units: Arc::clone(&ctx.growing_units),
            bus: Arc::clone(&ctx.bus),
            clock: Arc::clone(&ctx.clock),
        }
    }

    async fn load(&self, id: AggregateId) -> Result<GrowingUnit, DomainError> {
        Ok(AssertAggregateExists::new(self.growing_units.as_ref())
            .execute(id)
            .await?)
    }

    async fn commit(
        &self,
        unit: &mut GrowingUnit,
    ) -> Result<(Version, Vec<DomainEvent>), DomainError> {
        save_and_publish(self.growing_units.as_ref(), self.bus.as_ref(), unit).await
    }
}

/// Creates a growing unit at an existing location.
pub struct CreateGrowingUnitHandler {
    locations: Arc<dyn WriteRepository<Location>>,
    deps: UnitDeps,
}

impl CreateGrowingUnitHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            locations: Arc::clone(&ctx.locations),
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: CreateGrowingUnit) -> Result<CommandResult, DomainError> {
        AssertAggregateExists::new(self.locations.as_ref())
            .execute(cmd.location_id)
            .await?;

        let mut unit = GrowingUnit::create(AggregateId::new(), cmd, self.deps.clock.as_ref())?;
        let id = unit.id();
        let (version, events) = self.deps.commit(&mut unit).await?;

        tracing::info!(%id, location_id = %unit.location_id(), "growing unit created");
        Ok(CommandResult::for_aggregate(id, version, events))
    }
}

pub struct UpdateGrowingUnitHandler {
    deps: UnitDeps,
}

impl UpdateGrowingUnitHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(id = %cmd.id))]
    pub async fn execute(&self, cmd: UpdateGrowingUnit) -> Result<CommandResult, DomainError> {
        let mut unit = self.deps.load(cmd.id).await?;
        unit.update(cmd.changes, self.deps.clock.as_ref())?;

        let (version, events) = self.deps.commit(&mut unit).await?;
        Ok(CommandResult::for_aggregate(cmd.id, version, events))
    }
}

pub struct DeleteGrowingUnitHandler {
    deps: UnitDeps,
}

impl DeleteGrowingUnitHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: DeleteGrowingUnit) -> Result<CommandResult, DomainError> {
        let mut unit = self.deps.load(cmd.id).await?;
        unit.delete(self.deps.clock.as_ref())?;

        let (version, events) = self.deps.commit(&mut unit).await?;
        tracing::info!(id = %cmd.id, "growing unit deleted");
        Ok(CommandResult::for_aggregate(cmd.id, version, events))
    }
}

/// Adds a plant under a freshly generated plant id.
pub struct AddPlantHandler {
    deps: UnitDeps,
}

impl AddPlantHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(growing_unit_id = %cmd.growing_unit_id))]
    pub async fn execute(&self, cmd: AddPlant) -> Result<CommandResult, DomainError> {
        let mut unit = self.deps.load(cmd.growing_unit_id).await?;
        let plant_id = PlantId::new();
        unit.add_plant(plant_id, cmd.plant, self.deps.clock.as_ref())?;

        let (version, events) = self.deps.commit(&mut unit).await?;
        tracing::info!(%plant_id, "plant added");
        Ok(CommandResult {
            aggregate_id: cmd.growing_unit_id,
            entity_id: plant_id.as_uuid(),
            version,
            events,
        })
    }
}

pub struct UpdatePlantHandler {
    deps: UnitDeps,
}

impl UpdatePlantHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self, cmd), fields(growing_unit_id = %cmd.growing_unit_id, plant_id = %cmd.plant_id))]
    pub async fn execute(&self, cmd: UpdatePlant) -> Result<CommandResult, DomainError> {
        let mut unit = self.deps.load(cmd.growing_unit_id).await?;
        unit.update_plant(cmd.plant_id, cmd.changes, self.deps.clock.as_ref())?;

        let (version, events) = self.deps.commit(&mut unit).await?;
        Ok(CommandResult {
            aggregate_id: cmd.growing_unit_id,
            entity_id: cmd.plant_id.as_uuid(),
            version,
            events,
        })
    }
}

pub struct RemovePlantHandler {
    deps: UnitDeps,
}

impl RemovePlantHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: RemovePlant) -> Result<CommandResult, DomainError> {
        let mut unit = self.deps.load(cmd.growing_unit_id).await?;
        unit.remove_plant(cmd.plant_id, self.deps.clock.as_ref())?;

        let (version, events) = self.deps.commit(&mut unit).await?;
        Ok(CommandResult {
            aggregate_id: cmd.growing_unit_id,
            entity_id: cmd.plant_id.as_uuid(),
            version,
            events,
        })
    }
}

/// Moves a plant from one growing unit to another.
///
/// The target's capacity is checked before either unit changes. The target
/// is saved first: if the source save then fails, the target is restored to
/// its previous state, so the plant is never missing from both units. Both
/// units are saved before anything is published, and the source's events are
/// published before the target's. The result names the target unit.
pub struct TransplantPlantHandler {
    deps: UnitDeps,
}

impl TransplantPlantHandler {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            deps: UnitDeps::new(ctx),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, cmd: TransplantPlant) -> Result<CommandResult, DomainError> {
        if cmd.source_growing_unit_id == cmd.target_growing_unit_id {
            return Err(GrowingUnitError::SameGrowingUnit.into());
        }

        let mut source = self.deps.load(cmd.source_growing_unit_id).await?;
        let mut target = self.deps.load(cmd.target_growing_unit_id).await?;
        let clock = self.deps.clock.as_ref();

        let plant = source
            .plant(cmd.plant_id)
            .cloned()
            .ok_or(GrowingUnitError::PlantNotFound {
                plant_id: cmd.plant_id,
            })?;
        let previous_target = target.clone();
        target.transplant_in(plant, source.id(), clock)?;
        source.transplant_out(cmd.plant_id, target.id(), clock)?;

        let repository = self.deps.growing_units.as_ref();
        let version = persist(repository, &mut target).await?;
        if let Err(err) = persist(repository, &mut source).await {
            restore(repository, previous_target, version).await;
            return Err(err);
        }

        let mut events = publish(self.deps.bus.as_ref(), &mut source).await?;
        events.extend(publish(self.deps.bus.as_ref(), &mut target).await?);

        tracing::info!(
            plant_id = %cmd.plant_id,
            from = %cmd.source_growing_unit_id,
            to = %cmd.target_growing_unit_id,
            "plant transplanted"
        );
        Ok(CommandResult {
            aggregate_id: cmd.target_growing_unit_id,
            entity_id: cmd.plant_id.as_uuid(),
            version,
            events,
        })
    }
}

/// Writes `previous` back over the state saved at `saved_version`.
async fn restore(
    repository: &dyn WriteRepository<GrowingUnit>,
    mut previous: GrowingUnit,
    saved_version: Version,
) {
    let id = previous.id();
    previous.set_version(saved_version);
    match repository.save(&mut previous).await {
        Ok(_) => tracing::warn!(growing_unit_id = %id, "transplant rolled back on target"),
        Err(e) => tracing::error!(
            growing_unit_id = %id,
            error = %e,
            "transplant rollback failed; plant is present in both units"
        ),
    }
}
