//! Growing unit aggregate: a container of plants placed at a location.

mod aggregate;
mod commands;
mod handlers;
mod plant;

pub use aggregate::{GrowingUnit, GrowingUnitPrimitives};
pub use commands::{
    AddPlant, CreateGrowingUnit, DeleteGrowingUnit, GrowingUnitChanges, NewPlant, PlantChanges,
    RemovePlant, TransplantPlant, UpdateGrowingUnit, UpdatePlant,
};
pub use handlers::{
    AddPlantHandler, CreateGrowingUnitHandler, DeleteGrowingUnitHandler, RemovePlantHandler,
    TransplantPlantHandler, UpdateGrowingUnitHandler, UpdatePlantHandler,
};
pub use plant::Plant;

use thiserror::Error;

use crate::value_objects::{InvalidCapacity, InvalidName, PlantId};

/// Errors that can occur during growing unit and plant operations.
#[derive(Debug, Error)]
pub enum GrowingUnitError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    #[error(transparent)]
    InvalidCapacity(#[from] InvalidCapacity),

    #[error("Growing unit is at full capacity ({capacity} plants)")]
    FullCapacity { capacity: u32 },

    #[error("Capacity {capacity} is below the current plant count {plant_count}")]
    CapacityBelowPlantCount { capacity: u32, plant_count: usize },

    /// Growing units can only be deleted once empty.
    #[error("Growing unit still has {count} plant(s)")]
    HasPlants { count: usize },

    #[error("Plant {plant_id} not found in growing unit")]
    PlantNotFound { plant_id: PlantId },

    #[error("Plant {plant_id} is already in this growing unit")]
    PlantAlreadyPresent { plant_id: PlantId },

    #[error("A plant cannot be transplanted into its own growing unit")]
    SameGrowingUnit,

    #[error("Growing unit is already deleted")]
    AlreadyDeleted,
}

impl GrowingUnitError {
    pub fn code(&self) -> &'static str {
        match self {
            GrowingUnitError::InvalidName(_) => "INVALID_NAME",
            GrowingUnitError::InvalidCapacity(_) => "INVALID_CAPACITY",
            GrowingUnitError::FullCapacity { .. } => "GROWING_UNIT_FULL_CAPACITY",
            GrowingUnitError::CapacityBelowPlantCount { .. } => {
                "GROWING_UNIT_CAPACITY_BELOW_PLANT_COUNT"
            }
            GrowingUnitError::HasPlants { .. } => "GROWING_UNIT_HAS_PLANTS",
            GrowingUnitError::PlantNotFound { .. } => "PLANT_NOT_FOUND",
            GrowingUnitError::PlantAlreadyPresent { .. } => "PLANT_ALREADY_IN_GROWING_UNIT",
            GrowingUnitError::SameGrowingUnit => "TRANSPLANT_SAME_GROWING_UNIT",
            GrowingUnitError::AlreadyDeleted => "GROWING_UNIT_ALREADY_DELETED",
        }
    }
}
