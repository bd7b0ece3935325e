use chrono::{DateTime, Utc};
use domain::{Location, LocationType};
use serde::{Deserialize, Serialize};
use store::{Persistable, ViewModel};
use uuid::Uuid;

use super::required;
use crate::Result;

/// Read-side projection of a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationViewModel {
    id: Uuid,
    name: String,
    location_type: LocationType,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LocationViewModel {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl ViewModel for LocationViewModel {
    const KIND: &'static str = "Location";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Step builder for [`LocationViewModel`].
#[derive(Debug, Default)]
pub struct LocationViewModelBuilder {
    id: Option<Uuid>,
    name: Option<String>,
    location_type: Option<LocationType>,
    description: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl LocationViewModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) -> &mut Self {
        *self = Self::default();
        self
    }

    pub fn from_aggregate(&mut self, location: &Location) -> &mut Self {
        self.id = Some(location.id().as_uuid());
        self.name = Some(location.name().to_string());
        self.location_type = Some(location.location_type());
        self.description = location.description().map(str::to_string);
        self.created_at = Some(location.created_at());
        self.updated_at = Some(location.updated_at());
        self
    }

    pub fn build(&self) -> Result<LocationViewModel> {
        const VIEW: &str = "LocationViewModel";
        Ok(LocationViewModel {
            id: required(&self.id, VIEW, "id")?,
            name: required(&self.name, VIEW, "name")?,
            location_type: required(&self.location_type, VIEW, "locationType")?,
            description: self.description.clone(),
            created_at: required(&self.created_at, VIEW, "createdAt")?,
            updated_at: required(&self.updated_at, VIEW, "updatedAt")?,
        })
    }
}
