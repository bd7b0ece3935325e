//! Write side of the growing-unit backend.
//!
//! This crate provides:
//! - The [`AggregateRoot`] contract and the domain events aggregates record
//! - The `Location` and `GrowingUnit` aggregates (plants live inside growing units)
//! - Command handlers that save aggregates and then publish their events
//! - The [`EventBus`] seam and the typed [`CommandBus`]

pub mod aggregate;
pub mod bus;
pub mod command;
pub mod command_bus;
pub mod error;
pub mod event;
pub mod growing_unit;
pub mod location;
pub mod value_objects;

pub use aggregate::{AggregateRoot, EventRecorder};
pub use bus::{EventBus, EventBusError, RecordingEventBus};
pub use command::{CommandContext, CommandResult};
pub use command_bus::{Command, CommandBus};
pub use error::DomainError;
pub use event::{
    DeletedData, DomainEvent, EntityKind, EventId, EventPayload, EventType, GrowingUnitCreatedData,
    GrowingUnitUpdatedData, LocationCreatedData, LocationUpdatedData, PlantAddedData,
    PlantRemovedData, PlantTransplantedData, PlantUpdatedData,
};
pub use growing_unit::{
    AddPlant, CreateGrowingUnit, DeleteGrowingUnit, GrowingUnit, GrowingUnitChanges,
    GrowingUnitError, GrowingUnitPrimitives, NewPlant, Plant, PlantChanges, RemovePlant,
    TransplantPlant, UpdateGrowingUnit, UpdatePlant,
};
pub use location::{
    CreateLocation, DeleteLocation, Location, LocationChanges, LocationError, LocationPrimitives,
    UpdateLocation,
};
pub use value_objects::{
    Capacity, GrowingUnitType, InvalidCapacity, InvalidName, LocationType, Name, PlantId,
    PlantStatus,
};
