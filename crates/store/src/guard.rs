//! Load-or-fail helpers for existence preconditions.

use uuid::Uuid;

use crate::{
    AggregateId, Result, StoreError,
    read::{ReadRepository, ViewModel},
    write::{Persistable, WriteRepository},
};

/// Loads an aggregate or fails with `NotFound` naming its kind and id.
pub struct AssertAggregateExists<'a, T: Persistable> {
    repository: &'a dyn WriteRepository<T>,
}

impl<'a, T: Persistable> AssertAggregateExists<'a, T> {
    pub fn new(repository: &'a dyn WriteRepository<T>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: AggregateId) -> Result<T> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }
}

/// Loads a view model or fails with `NotFound` naming its kind and id.
pub struct AssertViewExists<'a, V: ViewModel> {
    repository: &'a dyn ReadRepository<V>,
}

impl<'a, V: ViewModel> AssertViewExists<'a, V> {
    pub fn new(repository: &'a dyn ReadRepository<V>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, id: Uuid) -> Result<V> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(V::KIND, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryReadRepository;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Tag {
        id: Uuid,
    }

    impl ViewModel for Tag {
        const KIND: &'static str = "Tag";

        fn id(&self) -> Uuid {
            self.id
        }
    }

    #[tokio::test]
    async fn returns_existing_view() {
        let repo = InMemoryReadRepository::<Tag>::new();
        let id = Uuid::new_v4();
        repo.save(Tag { id }).await.unwrap();

        let view = AssertViewExists::<Tag>::new(&repo).execute(id).await.unwrap();
        assert_eq!(view.id, id);
    }

    #[tokio::test]
    async fn not_found_carries_kind_and_id() {
        let repo = InMemoryReadRepository::<Tag>::new();
        let id = Uuid::new_v4();

        let err = AssertViewExists::<Tag>::new(&repo).execute(id).await.unwrap_err();
        assert!(matches!(&err, StoreError::NotFound { kind: "Tag", .. }));
        assert_eq!(err.to_string(), format!("Tag with id {id} not found"));
    }
}
