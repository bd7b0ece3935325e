use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{AggregateId, Criteria, PaginatedResult, Result, Version};

/// An aggregate that can be stored in the write store.
///
/// The write store holds plain primitives, never domain objects. Loading an
/// aggregate goes through [`Persistable::from_primitives`], which must
/// rebuild state without recording any domain event.
pub trait Persistable: Send + Sync + Sized + 'static {
    /// Entity kind, used in documents and not-found messages.
    const KIND: &'static str;

    /// Serializable snapshot of the aggregate's state.
    type Primitives: Serialize + DeserializeOwned + Send + Sync;

    fn id(&self) -> AggregateId;

    /// Version the aggregate was loaded at (0 if never saved).
    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);

    /// Soft-deleted aggregates keep their row but are no longer found.
    fn is_deleted(&self) -> bool;

    fn to_primitives(&self) -> Self::Primitives;

    fn from_primitives(primitives: Self::Primitives, version: Version) -> Self;
}

/// Repository for aggregate state.
///
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait WriteRepository<T: Persistable>: Send + Sync {
    /// Loads an aggregate. Soft-deleted aggregates are reported as absent.
    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>>;

    /// Persists the aggregate's current state.
    ///
    /// Fails with `ConcurrencyConflict` if the stored version differs from
    /// `aggregate.version()`. On success the aggregate is moved to the new
    /// version, which is also returned.
    async fn save(&self, aggregate: &mut T) -> Result<Version>;

    /// Removes the row entirely.
    async fn delete(&self, id: AggregateId) -> Result<()>;

    /// Searches live (not soft-deleted) aggregates by their primitives.
    async fn find_by_criteria(&self, criteria: &Criteria) -> Result<PaginatedResult<T>>;

    /// Like [`WriteRepository::find_by_criteria`] but returns every match.
    async fn find_all_by_criteria(&self, criteria: &Criteria) -> Result<Vec<T>>;
}
