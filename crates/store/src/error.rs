use thiserror::Error;

use crate::{AggregateId, Version};

/// Errors that can occur when interacting with the write or read store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity does not exist (or has been soft-deleted).
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// The stored version did not match the version the caller loaded.
    #[error(
        "Concurrency conflict for {kind} {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        kind: &'static str,
        aggregate_id: AggregateId,
        expected: Version,
        actual: Version,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Builds a not-found error for the given entity kind and id.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
