//! Shared types for the growing-unit backend.
//!
//! Identifiers used across the write and read sides, plus the clock
//! abstraction aggregates use to stamp their mutations.

pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use types::AggregateId;
