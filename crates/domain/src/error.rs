//! Domain error types.

use common::AggregateId;
use store::StoreError;
use thiserror::Error;

use crate::bus::EventBusError;
use crate::growing_unit::GrowingUnitError;
use crate::location::LocationError;

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A required aggregate does not exist (or was soft-deleted).
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Growing unit error: {0}")]
    GrowingUnit(#[from] GrowingUnitError),

    /// An error occurred in the write store.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// State was saved but its events could not be published.
    ///
    /// The events remain uncommitted on the aggregate.
    #[error("Events of aggregate {aggregate_id} were saved but not published: {source}")]
    PublicationFailed {
        aggregate_id: AggregateId,
        source: EventBusError,
    },
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, id } => DomainError::NotFound { kind, id },
            other => DomainError::Store(other),
        }
    }
}

impl DomainError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Location(e) => e.code(),
            DomainError::GrowingUnit(e) => e.code(),
            DomainError::Store(StoreError::ConcurrencyConflict { .. }) => "CONCURRENCY_CONFLICT",
            DomainError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
            DomainError::Store(StoreError::Serialization(_)) => "SERIALIZATION_ERROR",
            DomainError::Store(StoreError::Unavailable(_)) => "STORE_UNAVAILABLE",
            DomainError::PublicationFailed { .. } => "EVENT_PUBLICATION_FAILED",
        }
    }
}
