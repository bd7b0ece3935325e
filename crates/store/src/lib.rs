//! Storage seams for the CQRS core.
//!
//! - [`WriteRepository`] persists aggregates as versioned documents
//! - [`ReadRepository`] persists view models and answers [`Criteria`] searches
//! - [`engine`] evaluates criteria (filter, sort, paginate) over documents
//! - [`AssertAggregateExists`] / [`AssertViewExists`] implement load-or-fail
//! - [`InMemoryWriteRepository`] / [`InMemoryReadRepository`] back both sides in-process

pub mod criteria;
pub mod document;
pub mod engine;
pub mod error;
pub mod guard;
pub mod memory;
pub mod pagination;
pub mod read;
pub mod write;

pub use common::AggregateId;
pub use criteria::{
    Criteria, DEFAULT_PAGE, DEFAULT_PER_PAGE, Filter, FilterOperator, Pagination, Sort,
    SortDirection,
};
pub use document::{StoredDocument, Version};
pub use error::{Result, StoreError};
pub use guard::{AssertAggregateExists, AssertViewExists};
pub use memory::{InMemoryReadRepository, InMemoryWriteRepository};
pub use pagination::PaginatedResult;
pub use read::{ReadRepository, ViewModel};
pub use write::{Persistable, WriteRepository};
