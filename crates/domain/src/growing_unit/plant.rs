use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Name, PlantId, PlantStatus};

use super::{GrowingUnitError, NewPlant, PlantChanges};

/// A plant living in a growing unit.
///
/// Plants are entities inside the growing unit aggregate; only the owning
/// unit can change them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    id: PlantId,
    name: Name,
    species: Option<String>,
    status: PlantStatus,
    planted_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Plant {
    pub(super) fn new(
        id: PlantId,
        data: NewPlant,
        now: DateTime<Utc>,
    ) -> Result<Self, GrowingUnitError> {
        Ok(Self {
            id,
            name: Name::new(&data.name)?,
            species: data.species,
            status: data.status.unwrap_or_default(),
            planted_at: data.planted_at,
            notes: data.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Validates first, then applies every present field.
    pub(super) fn apply_changes(
        &mut self,
        changes: PlantChanges,
        now: DateTime<Utc>,
    ) -> Result<(), GrowingUnitError> {
        let name = changes.name.as_deref().map(Name::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if changes.species.is_some() {
            self.species = changes.species;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if changes.planted_at.is_some() {
            self.planted_at = changes.planted_at;
        }
        if changes.notes.is_some() {
            self.notes = changes.notes;
        }
        self.updated_at = now;
        Ok(())
    }

    pub(super) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn id(&self) -> PlantId {
        self.id
    }

    pub fn name(&self) -> &Name {
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
