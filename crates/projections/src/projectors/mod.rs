//! Projectors keep the read stores in step with the write side.
//!
//! Each projector reloads the current aggregate from its write repository
//! and rebuilds the view from it, so replaying an event is harmless.

mod growing_unit;
mod location;
mod plant;

use std::sync::Arc;

use domain::{GrowingUnit, Location};
use store::WriteRepository;

pub use growing_unit::GrowingUnitProjector;
pub use location::LocationProjector;
pub use plant::PlantProjector;

use crate::dispatcher::EventDispatcher;
use crate::query::ViewStores;

/// Registers the three projectors in the order views depend on each other:
/// locations first, then growing units, then plants.
pub fn register_projectors(
    dispatcher: &mut EventDispatcher,
    locations: Arc<dyn WriteRepository<Location>>,
    growing_units: Arc<dyn WriteRepository<GrowingUnit>>,
    views: &ViewStores,
) {
    dispatcher.register(Arc::new(LocationProjector::new(
        Arc::clone(&locations),
        Arc::clone(&views.locations),
    )));
    dispatcher.register(Arc::new(GrowingUnitProjector::new(
        Arc::clone(&growing_units),
        Arc::clone(&views.locations),
        Arc::clone(&views.growing_units),
    )));
    dispatcher.register(Arc::new(PlantProjector::new(
        growing_units,
        Arc::clone(&views.locations),
        Arc::clone(&views.plants),
    )));
}
