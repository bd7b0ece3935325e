//! Growing unit and plant commands.

use chrono::{DateTime, Utc};
use common::AggregateId;
use serde::Deserialize;

use crate::value_objects::{GrowingUnitType, PlantId, PlantStatus};

/// Command to create a growing unit at an existing location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGrowingUnit {
    pub location_id: AggregateId,
    pub name: String,
    pub unit_type: GrowingUnitType,
    pub capacity: u32,
}

impl CreateGrowingUnit {
    pub fn new(
        location_id: AggregateId,
        name: impl Into<String>,
        unit_type: GrowingUnitType,
        capacity: u32,
    ) -> Self {
        Self {
            location_id,
            name: name.into(),
            unit_type,
            capacity,
        }
    }
}

/// Partial update of a growing unit; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GrowingUnitChanges {
    pub name: Option<String>,
    pub unit_type: Option<GrowingUnitType>,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct UpdateGrowingUnit {
    pub id: AggregateId,
    pub changes: GrowingUnitChanges,
}

impl UpdateGrowingUnit {
    pub fn new(id: AggregateId, changes: GrowingUnitChanges) -> Self {
        Self { id, changes }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteGrowingUnit {
    pub id: AggregateId,
}

impl DeleteGrowingUnit {
    pub fn new(id: AggregateId) -> Self {
        Self { id }
    }
}

/// Data for a plant being added to a growing unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub status: Option<PlantStatus>,
    #[serde(default)]
    pub planted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPlant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: None,
            status: None,
            planted_at: None,
            notes: None,
        }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }
}

/// Partial update of a plant; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantChanges {
    pub name: Option<String>,
    pub species: Option<String>,
    pub status: Option<PlantStatus>,
    pub planted_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Command to add a plant. The plant id is generated by the handler.
#[derive(Debug, Clone)]
pub struct AddPlant {
    pub growing_unit_id: AggregateId,
    pub plant: NewPlant,
}

impl AddPlant {
    pub fn new(growing_unit_id: AggregateId, plant: NewPlant) -> Self {
        Self {
            growing_unit_id,
            plant,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePlant {
    pub growing_unit_id: AggregateId,
    pub plant_id: PlantId,
    pub changes: PlantChanges,
}

impl UpdatePlant {
    pub fn new(growing_unit_id: AggregateId, plant_id: PlantId, changes: PlantChanges) -> Self {
        Self {
            growing_unit_id,
            plant_id,
            changes,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RemovePlant {
    pub growing_unit_id: AggregateId,
    pub plant_id: PlantId,
}

impl RemovePlant {
    pub fn new(growing_unit_id: AggregateId, plant_id: PlantId) -> Self {
        Self {
            growing_unit_id,
            plant_id,
        }
    }
}

/// Command to move a plant between two different growing units.
#[derive(Debug, Clone, Copy)]
pub struct TransplantPlant {
    pub plant_id: PlantId,
    pub source_growing_unit_id: AggregateId,
    pub target_growing_unit_id: AggregateId,
}

impl TransplantPlant {
    pub fn new(
        plant_id: PlantId,
        source_growing_unit_id: AggregateId,
        target_growing_unit_id: AggregateId,
    ) -> Self {
        Self {
            plant_id,
            source_growing_unit_id,
            target_growing_unit_id,
        }
    }
}
