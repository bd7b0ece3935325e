//! Read side of the growing-unit backend.
//!
//! This crate provides the query side of the CQRS pattern:
//! - [`EventHandler`] contract and the in-process [`EventDispatcher`]
//! - Projectors that rebuild view models from the current aggregate state
//! - View models and their builders for locations, growing units and plants
//! - Query handlers and the typed [`QueryBus`]

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod projectors;
pub mod query;
pub mod views;

pub use dispatcher::{
    DEFAULT_DEAD_LETTER_CAPACITY, DeadLetter, DeadLetterLog, EventDispatcher, RedeliveryReport,
};
pub use error::{ProjectionError, Result};
pub use handler::EventHandler;
pub use projectors::{GrowingUnitProjector, LocationProjector, PlantProjector, register_projectors};
pub use query::{
    FindGrowingUnitByIdHandler, FindGrowingUnitsByCriteriaHandler, FindLocationByIdHandler,
    FindLocationsByCriteriaHandler, FindPlantByIdHandler, FindPlantsByCriteriaHandler,
    FindViewByIdHandler, FindViewsByCriteriaHandler, Query, QueryBus, QueryResult, ViewStores,
};
pub use views::{
    GrowingUnitViewModel, GrowingUnitViewModelBuilder, LocationViewModel,
    LocationViewModelBuilder, PlantSummary, PlantViewModel, PlantViewModelBuilder,
};
