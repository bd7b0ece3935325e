//! Typed dispatch table over every command of the domain.

use crate::command::{CommandContext, CommandResult};
use crate::error::DomainError;
use crate::growing_unit::{
    AddPlant, AddPlantHandler, CreateGrowingUnit, CreateGrowingUnitHandler, DeleteGrowingUnit,
    DeleteGrowingUnitHandler, RemovePlant, RemovePlantHandler, TransplantPlant,
    TransplantPlantHandler, UpdateGrowingUnit, UpdateGrowingUnitHandler, UpdatePlant,
    UpdatePlantHandler,
};
use crate::location::{
    CreateLocation, CreateLocationHandler, DeleteLocation, DeleteLocationHandler, UpdateLocation,
    UpdateLocationHandler,
};

/// Every command the write side accepts.
#[derive(Debug, Clone)]
pub enum Command {
    CreateLocation(CreateLocation),
    UpdateLocation(UpdateLocation),
    DeleteLocation(DeleteLocation),
    CreateGrowingUnit(CreateGrowingUnit),
    UpdateGrowingUnit(UpdateGrowingUnit),
    DeleteGrowingUnit(DeleteGrowingUnit),
    AddPlant(AddPlant),
    UpdatePlant(UpdatePlant),
    RemovePlant(RemovePlant),
    TransplantPlant(TransplantPlant),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateLocation(_) => "CreateLocation",
            Command::UpdateLocation(_) => "UpdateLocation",
            Command::DeleteLocation(_) => "DeleteLocation",
            Command::CreateGrowingUnit(_) => "CreateGrowingUnit",
            Command::UpdateGrowingUnit(_) => "UpdateGrowingUnit",
            Command::DeleteGrowingUnit(_) => "DeleteGrowingUnit",
            Command::AddPlant(_) => "AddPlant",
            Command::UpdatePlant(_) => "UpdatePlant",
            Command::RemovePlant(_) => "RemovePlant",
            Command::TransplantPlant(_) => "TransplantPlant",
        }
    }
}

/// Routes each [`Command`] to its handler.
pub struct CommandBus {
    create_location: CreateLocationHandler,
    update_location: UpdateLocationHandler,
    delete_location: DeleteLocationHandler,
    create_growing_unit: CreateGrowingUnitHandler,
    update_growing_unit: UpdateGrowingUnitHandler,
    delete_growing_unit: DeleteGrowingUnitHandler,
    add_plant: AddPlantHandler,
    update_plant: UpdatePlantHandler,
    remove_plant: RemovePlantHandler,
    transplant_plant: TransplantPlantHandler,
}

impl CommandBus {
    pub fn new(ctx: &CommandContext) -> Self {
        Self {
            create_location: CreateLocationHandler::new(ctx),
            update_location: UpdateLocationHandler::new(ctx),
            delete_location: DeleteLocationHandler::new(ctx),
            create_growing_unit: CreateGrowingUnitHandler::new(ctx),
            update_growing_unit: UpdateGrowingUnitHandler::new(ctx),
            delete_growing_unit: DeleteGrowingUnitHandler::new(ctx),
            add_plant: AddPlantHandler::new(ctx),
            update_plant: UpdatePlantHandler::new(ctx),
            remove_plant: RemovePlantHandler::new(ctx),
            transplant_plant: TransplantPlantHandler::new(ctx),
        }
    }

    #[tracing::instrument(skip(self, command), fields(command = command.name()))]
    pub async fn execute(&self, command: Command) -> Result<CommandResult, DomainError> {
        let name = command.name();
        let result = match command {
            Command::CreateLocation(cmd) => self.create_location.execute(cmd).await,
            Command::UpdateLocation(cmd) => self.update_location.execute(cmd).await,
            Command::DeleteLocation(cmd) => self.delete_location.execute(cmd).await,
            Command::CreateGrowingUnit(cmd) => self.create_growing_unit.execute(cmd).await,
            Command::UpdateGrowingUnit(cmd) => self.update_growing_unit.execute(cmd).await,
            Command::DeleteGrowingUnit(cmd) => self.delete_growing_unit.execute(cmd).await,
            Command::AddPlant(cmd) => self.add_plant.execute(cmd).await,
            Command::UpdatePlant(cmd) => self.update_plant.execute(cmd).await,
            Command::RemovePlant(cmd) => self.remove_plant.execute(cmd).await,
            Command::TransplantPlant(cmd) => self.transplant_plant.execute(cmd).await,
        };

        match &result {
            Ok(_) => {
                metrics::counter!("commands_executed_total", "command" => name).increment(1);
            }
            Err(e) => {
                tracing::warn!(command = name, code = e.code(), error = %e, "command rejected");
                metrics::counter!("commands_failed_total", "command" => name, "code" => e.code())
                    .increment(1);
            }
        }
        result
    }
}
