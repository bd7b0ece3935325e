//! Location aggregate: a place that holds growing units.

mod aggregate;
mod commands;
mod handlers;

pub use aggregate::{Location, LocationPrimitives};
pub use commands::{CreateLocation, DeleteLocation, LocationChanges, UpdateLocation};
pub use handlers::{CreateLocationHandler, DeleteLocationHandler, UpdateLocationHandler};

use thiserror::Error;

use crate::value_objects::InvalidName;

/// Errors that can occur during location operations.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error(transparent)]
    InvalidName(#[from] InvalidName),

    /// Locations can only be deleted once their growing units are gone.
    #[error("Location still has {count} growing unit(s)")]
    HasGrowingUnits { count: usize },

    #[error("Location is already deleted")]
    AlreadyDeleted,
}

impl LocationError {
    pub fn code(&self) -> &'static str {
        match self {
            LocationError::InvalidName(_) => "INVALID_NAME",
            LocationError::HasGrowingUnits { .. } => "LOCATION_HAS_GROWING_UNITS",
            LocationError::AlreadyDeleted => "LOCATION_ALREADY_DELETED",
        }
    }
}
