//! Projection error types.

use thiserror::Error;

/// Errors that can occur while projecting an event.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An error occurred in the write or read store.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// A view model builder was asked to build before a required field was set.
    #[error("Cannot build {view}: missing {field}")]
    IncompleteViewModel {
        view: &'static str,
        field: &'static str,
    },

    /// A projection-specific error.
    #[error("Projection error: {0}")]
    Projection(String),
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
