use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    AggregateId, Criteria, PaginatedResult, Result, StoreError, StoredDocument, Version, engine,
    read::{ReadRepository, ViewModel},
    write::{Persistable, WriteRepository},
};

/// In-memory write store.
///
/// Rows are kept as [`StoredDocument`]s so every save goes through the same
/// serialization as a real adapter would. Results without an explicit sort
/// are returned in id order.
pub struct InMemoryWriteRepository<T> {
    documents: Arc<RwLock<HashMap<AggregateId, StoredDocument>>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for InMemoryWriteRepository<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InMemoryWriteRepository<T> {
    fn default() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            _marker: PhantomData,
        }
    }
}

impl<T: Persistable> InMemoryWriteRepository<T> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rows, soft-deleted ones included.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns the raw row for an aggregate, soft-deleted or not.
    pub async fn document(&self, id: AggregateId) -> Option<StoredDocument> {
        self.documents.read().await.get(&id).cloned()
    }

    async fn live_documents(&self) -> Result<Vec<(serde_json::Value, T)>> {
        let documents = self.documents.read().await;
        let mut rows: Vec<&StoredDocument> = documents.values().filter(|d| !d.deleted).collect();
        rows.sort_by_key(|d| d.id);

        rows.into_iter()
            .map(|doc| -> Result<(serde_json::Value, T)> {
                let aggregate = decode::<T>(doc)?;
                Ok((doc.data.clone(), aggregate))
            })
            .collect()
    }
}

fn decode<T: Persistable>(document: &StoredDocument) -> Result<T> {
    let primitives: T::Primitives = serde_json::from_value(document.data.clone())?;
    Ok(T::from_primitives(primitives, document.version))
}

#[async_trait]
impl<T: Persistable> WriteRepository<T> for InMemoryWriteRepository<T> {
    async fn find_by_id(&self, id: AggregateId) -> Result<Option<T>> {
        let documents = self.documents.read().await;
        match documents.get(&id) {
            Some(doc) if !doc.deleted => decode(doc).map(Some),
            _ => Ok(None),
        }
    }

    async fn save(&self, aggregate: &mut T) -> Result<Version> {
        let id = aggregate.id();
        let mut documents = self.documents.write().await;

        let actual = documents
            .get(&id)
            .map(|doc| doc.version)
            .unwrap_or(Version::initial());
        let expected = aggregate.version();
        if actual != expected {
            return Err(StoreError::ConcurrencyConflict {
                kind: T::KIND,
                aggregate_id: id,
                expected,
                actual,
            });
        }

        let next = expected.next();
        let document = StoredDocument::from_primitives(
            id,
            T::KIND,
            next,
            aggregate.is_deleted(),
            &aggregate.to_primitives(),
        )?;
        documents.insert(id, document);
        aggregate.set_version(next);

        tracing::debug!(kind = T::KIND, %id, version = %next, "aggregate saved");
        Ok(next)
    }

    async fn delete(&self, id: AggregateId) -> Result<()> {
        self.documents.write().await.remove(&id);
        Ok(())
    }

    async fn find_by_criteria(&self, criteria: &Criteria) -> Result<PaginatedResult<T>> {
        let documents = self.live_documents().await?;
        Ok(engine::apply_to_documents(documents, criteria))
    }

    async fn find_all_by_criteria(&self, criteria: &Criteria) -> Result<Vec<T>> {
        let documents = self.live_documents().await?;
        Ok(engine::select(documents, criteria))
    }
}

/// In-memory read store.
///
/// Views are kept in insertion order; an upsert replaces a view in place.
pub struct InMemoryReadRepository<V> {
    views: Arc<RwLock<Vec<V>>>,
}

impl<V> Clone for InMemoryReadRepository<V> {
    fn clone(&self) -> Self {
        Self {
            views: Arc::clone(&self.views),
        }
    }
}

impl<V> Default for InMemoryReadRepository<V> {
    fn default() -> Self {
        Self {
            views: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<V: ViewModel> InMemoryReadRepository<V> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored views.
    pub async fn count(&self) -> usize {
        self.views.read().await.len()
    }

    /// Returns a copy of every stored view.
    pub async fn all(&self) -> Vec<V> {
        self.views.read().await.clone()
    }
}

#[async_trait]
impl<V: ViewModel> ReadRepository<V> for InMemoryReadRepository<V> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<V>> {
        let views = self.views.read().await;
        Ok(views.iter().find(|v| v.id() == id).cloned())
    }

    async fn find_by_criteria(&self, criteria: &Criteria) -> Result<PaginatedResult<V>> {
        let views = self.views.read().await.clone();
        Ok(engine::apply(views, criteria)?)
    }

    async fn save(&self, view: V) -> Result<()> {
        let mut views = self.views.write().await;
        match views.iter_mut().find(|v| v.id() == view.id()) {
            Some(existing) => *existing = view,
            None => views.push(view),
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.views.write().await.retain(|v| v.id() != id);
        Ok(())
    }
}
