//! View models served by the read side, and the builders that assemble them.

mod growing_unit;
mod location;
mod plant;

pub use growing_unit::{GrowingUnitViewModel, GrowingUnitViewModelBuilder, PlantSummary};
pub use location::{LocationViewModel, LocationViewModelBuilder};
pub use plant::{PlantViewModel, PlantViewModelBuilder};

use crate::{ProjectionError, Result};

/// Unwraps a builder field or reports which one is missing.
fn required<T: Clone>(value: &Option<T>, view: &'static str, field: &'static str) -> Result<T> {
    value
        .clone()
        .ok_or(ProjectionError::IncompleteViewModel { view, field })
}
