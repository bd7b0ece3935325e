use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Criteria, PaginatedResult, Result};

/// A denormalized read-side projection.
///
/// View models are keyed by the id of their source aggregate. Criteria
/// filters and sorts address the serialized field names.
pub trait ViewModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity kind, used in not-found messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Repository for view models.
#[async_trait]
pub trait ReadRepository<V: ViewModel>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<V>>;

    async fn find_by_criteria(&self, criteria: &Criteria) -> Result<PaginatedResult<V>>;

    /// Inserts or replaces the view with the same id.
    async fn save(&self, view: V) -> Result<()>;

    /// Removes the view. Deleting a missing view is not an error.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
