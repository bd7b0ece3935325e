use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AggregateId;

/// Version number for a stored aggregate, used for optimistic concurrency control.
///
/// A document that was never saved is at version 0; every successful save
/// increments the version by 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for an aggregate that was never saved.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version (1) of the first save.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

/// One row of the write store: the primitives of a single aggregate.
///
/// Soft-deleted aggregates keep their row with `deleted` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The aggregate this document belongs to.
    pub id: AggregateId,

    /// The kind of aggregate (e.g., "Location", "GrowingUnit").
    pub kind: String,

    /// Version after the last save.
    pub version: Version,

    /// Whether the aggregate has been soft-deleted.
    pub deleted: bool,

    /// When the document was last written.
    pub stored_at: DateTime<Utc>,

    /// The serialized aggregate primitives.
    pub data: serde_json::Value,
}

impl StoredDocument {
    /// Creates a document from serializable primitives.
    pub fn from_primitives<T: Serialize>(
        id: AggregateId,
        kind: impl Into<String>,
        version: Version,
        deleted: bool,
        primitives: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id,
            kind: kind.into(),
            version,
            deleted,
            stored_at: Utc::now(),
            data: serde_json::to_value(primitives)?,
        })
    }
}
