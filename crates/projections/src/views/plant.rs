use chrono::{DateTime, Utc};
use domain::{GrowingUnit, Plant, PlantStatus};
use serde::{Deserialize, Serialize};
use store::{Persistable, ViewModel};
use uuid::Uuid;

use super::{LocationViewModel, required};
use crate::Result;

/// Read-side projection of a single plant, denormalized with its unit and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantViewModel {
    id: Uuid,
    growing_unit_id: Uuid,
    growing_unit_name: String,
    location_id: Uuid,
    location_name: Option<String>,
    name: String,
    species: Option<String>,
    status: PlantStatus,
    planted_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlantViewModel {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn growing_unit_id(&self) -> Uuid {
        self.growing_unit_id
    }

    pub fn growing_unit_name(&self) -> &str {
        &self.growing_unit_name
    }

    pub fn location_id(&self) -> Uuid {
        self.location_id
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> Option<&str> {
        self.species.as_deref()
    }

    pub fn status(&self) -> PlantStatus {
        self.status
    }

    pub fn planted_at(&self) -> Option<DateTime<Utc>> {
        self.planted_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl ViewModel for PlantViewModel {
    const KIND: &'static str = "Plant";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Step builder for [`PlantViewModel`].
#[derive(Debug, Default)]
pub struct PlantViewModelBuilder {
    id: Option<Uuid>,
    name: Option<String>,
    species: Option<String>,
    status: Option<PlantStatus>,
    planted_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    growing_unit_id: Option<Uuid>,
    growing_unit_name: Option<String>,
    location_id: Option<Uuid>,
    location_name: Option<String>,
}

impl PlantViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    pub fn from_plant(&mut self, plant: &Plant) -> &mut Self {
        self.id = Some(plant.id().as_uuid());
        self.name = Some(plant.name().to_string());
        self.species = plant.species().map(str::to_string);
        self.status = Some(plant.status());
        self.planted_at = plant.planted_at();
        self.notes = plant.notes().map(str::to_string);
        self.created_at = Some(plant.created_at());
        self.updated_at = Some(plant.updated_at());
        self
    }

    /// Sets the owning unit and, through it, the location id.
    pub fn with_growing_unit(&mut self, unit: &GrowingUnit) -> &mut Self {
        self.growing_unit_id = Some(unit.id().as_uuid());
        self.growing_unit_name = Some(unit.name().to_string());
        self.location_id = Some(unit.location_id().as_uuid());
        self
    }

    /// Location name is optional: the location projection may lag behind.
    pub fn with_location(&mut self, location: Option<&LocationViewModel>) -> &mut Self {
        self.location_name = location.map(|l| l.name().to_string());
        self
    }

    pub fn build(&self) -> Result<PlantViewModel> {
        const VIEW: &str = "PlantViewModel";
        Ok(PlantViewModel {
            id: required(&self.id, VIEW, "id")?,
            growing_unit_id: required(&self.growing_unit_id, VIEW, "growingUnitId")?,
            growing_unit_name: required(&self.growing_unit_name, VIEW, "growingUnitName")?,
            location_id: required(&self.location_id, VIEW, "locationId")?,
            location_name: self.location_name.clone(),
            name: required(&self.name, VIEW, "name")?,
            species: self.species.clone(),
            status: required(&self.status, VIEW, "status")?,
            planted_at: self.planted_at,
            notes: self.notes.clone(),
            created_at: required(&self.created_at, VIEW, "createdAt")?,
            updated_at: required(&self.updated_at, VIEW, "updatedAt")?,
        })
    }
}
