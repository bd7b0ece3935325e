//! Value objects shared by the location and growing-unit aggregates.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length of a [`Name`], in characters.
pub const NAME_MAX_LENGTH: usize = 100;

/// The name was empty or too long after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Name must be between 1 and {NAME_MAX_LENGTH} characters, got {length}")]
pub struct InvalidName {
    pub length: usize,
}

/// A trimmed, non-empty display name of at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, InvalidName> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length == 0 || length > NAME_MAX_LENGTH {
            return Err(InvalidName { length });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind of place a location is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Room,
    Balcony,
    Garden,
    Greenhouse,
    Windowsill,
}

/// Kind of container a growing unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrowingUnitType {
    Pot,
    GardenBed,
    HangingBasket,
    WindowBox,
}

/// Lifecycle status of a plant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlantStatus {
    #[default]
    Planted,
    Growing,
    Harvested,
    Dead,
}

/// Capacity must allow at least one plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Capacity must be at least 1, got {max}")]
pub struct InvalidCapacity {
    pub max: u32,
}

/// Maximum number of plants a growing unit can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity {
    max: u32,
}

impl Capacity {
    pub fn new(max: u32) -> Result<Self, InvalidCapacity> {
        if max == 0 {
            return Err(InvalidCapacity { max });
        }
        Ok(Self { max })
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Returns true if one more plant fits.
    pub fn has_capacity(&self, current: usize) -> bool {
        current < self.max as usize
    }

    /// Free slots left; never negative.
    pub fn remaining_capacity(&self, current: usize) -> usize {
        (self.max as usize).saturating_sub(current)
    }

    /// Returns true if `additional` more plants fit.
    pub fn can_add(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) <= self.max as usize
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.max)
    }
}

/// Unique identifier for a plant within a growing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(Uuid);

impl PlantId {
    /// Creates a new random plant ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PlantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for PlantId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<PlantId> for Uuid {
    fn from(id: PlantId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        let name = Name::new("  Kitchen window  ").unwrap();
        assert_eq!(name.as_str(), "Kitchen window");
    }

    #[test]
    fn name_rejects_blank_and_long_values() {
        assert_eq!(Name::new("   "), Err(InvalidName { length: 0 }));
        assert!(Name::new("x".repeat(100)).is_ok());
        assert_eq!(Name::new("x".repeat(101)), Err(InvalidName { length: 101 }));
    }

    #[test]
    fn name_counts_characters_not_bytes() {
        assert!(Name::new("ü".repeat(100)).is_ok());
    }

    #[test]
    fn capacity_must_be_positive() {
        assert_eq!(Capacity::new(0), Err(InvalidCapacity { max: 0 }));
        assert_eq!(Capacity::new(3).unwrap().max(), 3);
    }

    #[test]
    fn capacity_checks() {
        let capacity = Capacity::new(3).unwrap();
        assert!(capacity.has_capacity(2));
        assert!(!capacity.has_capacity(3));
        assert_eq!(capacity.remaining_capacity(1), 2);
        assert_eq!(capacity.remaining_capacity(5), 0);
        assert!(capacity.can_add(1, 2));
        assert!(!capacity.can_add(2, 2));
    }

    #[test]
    fn capacity_of_ten() {
        let capacity = Capacity::new(10).unwrap();
        assert!(!capacity.has_capacity(10));
        assert_eq!(capacity.remaining_capacity(10), 0);
        assert!(!capacity.can_add(8, 3));
        assert!(capacity.can_add(8, 2));
        assert_eq!(capacity.max() as usize, 10);
    }

    #[test]
    fn enums_use_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(GrowingUnitType::GardenBed).unwrap(),
            "GARDEN_BED"
        );
        assert_eq!(serde_json::to_value(LocationType::Windowsill).unwrap(), "WINDOWSILL");
        let status: PlantStatus = serde_json::from_value("HARVESTED".into()).unwrap();
        assert_eq!(status, PlantStatus::Harvested);
    }

    #[test]
    fn capacity_serializes_as_number() {
        let capacity = Capacity::new(4).unwrap();
        assert_eq!(serde_json::to_value(capacity).unwrap(), 4);
    }
}
