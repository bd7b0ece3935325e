//! Location commands.

use common::AggregateId;
use serde::Deserialize;

use crate::value_objects::LocationType;

/// Command to create a new location. The id is generated by the handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocation {
    pub name: String,
    pub location_type: LocationType,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateLocation {
    pub fn new(name: impl Into<String>, location_type: LocationType) -> Self {
        Self {
            name: name.into(),
            location_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a location; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub location_type: Option<LocationType>,
    pub description: Option<String>,
}

/// Command to update a location.
#[derive(Debug, Clone)]
pub struct UpdateLocation {
    pub id: AggregateId,
    pub changes: LocationChanges,
}

impl UpdateLocation {
    pub fn new(id: AggregateId, changes: LocationChanges) -> Self {
        Self { id, changes }
    }
}

/// Command to soft-delete a location with no growing units.
#[derive(Debug, Clone, Copy)]
pub struct DeleteLocation {
    pub id: AggregateId,
}

impl DeleteLocation {
    pub fn new(id: AggregateId) -> Self {
        Self { id }
    }
}
