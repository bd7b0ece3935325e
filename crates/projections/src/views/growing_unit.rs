use chrono::{DateTime, Utc};
use domain::{GrowingUnit, GrowingUnitType, Plant, PlantStatus};
use serde::{Deserialize, Serialize};
use store::{Persistable, ViewModel};
use uuid::Uuid;

use super::{LocationViewModel, required};
use crate::Result;

/// Plant entry embedded in a growing unit view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummary {
    pub id: Uuid,
    pub name: String,
    pub species: Option<String>,
    pub status: PlantStatus,
}

impl From<&Plant> for PlantSummary {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id().as_uuid(),
            name: plant.name().to_string(),
            species: plant.species().map(str::to_string),
            status: plant.status(),
        }
    }
}

/// Read-side projection of a growing unit, with its location embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowingUnitViewModel {
    id: Uuid,
    location_id: Uuid,
    location: LocationViewModel,
    name: String,
    unit_type: GrowingUnitType,
    capacity: u32,
    plant_count: usize,
    remaining_capacity: usize,
    plants: Vec<PlantSummary>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GrowingUnitViewModel {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn location_id(&self) -> Uuid {
        self.location_id
    }

    pub fn location(&self) -> &LocationViewModel {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_type(&self) -> GrowingUnitType {
        self.unit_type
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn plant_count(&self) -> usize {
        self.plant_count
    }

    pub fn remaining_capacity(&self) -> usize {
        self.remaining_capacity
    }

    pub fn plants(&self) -> &[PlantSummary] {
        &self.plants
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl ViewModel for GrowingUnitViewModel {
    const KIND: &'static str = "GrowingUnit";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Step builder for [`GrowingUnitViewModel`].
///
/// Needs both the aggregate and the location projection.
#[derive(Debug, Default)]
pub struct GrowingUnitViewModelBuilder {
    id: Option<Uuid>,
    location_id: Option<Uuid>,
    location: Option<LocationViewModel>,
    name: Option<String>,
    unit_type: Option<GrowingUnitType>,
    capacity: Option<u32>,
    plant_count: usize,
    remaining_capacity: usize,
    plants: Vec<PlantSummary>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl GrowingUnitViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    pub fn from_aggregate(&mut self, unit: &GrowingUnit) -> &mut Self {
        self.id = Some(unit.id().as_uuid());
        self.location_id = Some(unit.location_id().as_uuid());
        self.name = Some(unit.name().to_string());
        self.unit_type = Some(unit.unit_type());
        self.capacity = Some(unit.capacity().max());
        self.plant_count = unit.plant_count();
        self.remaining_capacity = unit.remaining_capacity();
        self.plants = unit.plants().iter().map(PlantSummary::from).collect();
        self.created_at = Some(unit.created_at());
        self.updated_at = Some(unit.updated_at());
        self
    }

    pub fn with_location(&mut self, location: LocationViewModel) -> &mut Self {
        self.location = Some(location);
        self
    }

    pub fn build(&self) -> Result<GrowingUnitViewModel> {
        const VIEW: &str = "GrowingUnitViewModel";
        Ok(GrowingUnitViewModel {
            id: required(&self.id, VIEW, "id")?,
            location_id: required(&self.location_id, VIEW, "locationId")?,
            location: required(&self.location, VIEW, "location")?,
            name: required(&self.name, VIEW, "name")?,
            unit_type: required(&self.unit_type, VIEW, "unitType")?,
            capacity: required(&self.capacity, VIEW, "capacity")?,
            plant_count: self.plant_count,
            remaining_capacity: self.remaining_capacity,
            plants: self.plants.clone(),
            created_at: required(&self.created_at, VIEW, "createdAt")?,
            updated_at: required(&self.updated_at, VIEW, "updatedAt")?,
        })
    }
}
