//! # RemoteResource Trait
//!
//! The transport-agnostic interface controllers use to reach a resource type.
//! [`ResourceClient`](crate::ResourceClient) implements it over channels; a
//! generated HTTP client would implement it over the wire.

use crate::entity::{ResourceEntity, UsedByEntry};
use crate::error::ClientError;
use crate::query::{ListQuery, Page};
use async_trait::async_trait;

/// Remote operations for one resource type.
///
/// Implementations must be cheap to clone: controllers hand a clone to every
/// call they spawn.
#[async_trait]
pub trait RemoteResource<T: ResourceEntity>: Clone + Send + Sync + 'static {
    async fn list(&self, query: ListQuery) -> Result<Page<T>, ClientError>;

    async fn retrieve(&self, id: T::Id) -> Result<T, ClientError>;

    async fn create(&self, payload: T::Payload) -> Result<T, ClientError>;

    async fn update(&self, id: T::Id, payload: T::Payload) -> Result<T, ClientError>;

    async fn delete(&self, id: T::Id) -> Result<(), ClientError>;

    async fn used_by(&self, id: T::Id) -> Result<Vec<UsedByEntry>, ClientError>;

    /// Every item matching `query`, walking pages until the last one.
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn list_all(&self, query: ListQuery) -> Result<Vec<T>, ClientError> {
        let mut query = query;
        query.page = 1;
        let mut items = Vec::new();
        loop {
            let page = self.list(query.clone()).await?;
            let more = page.has_next() && !page.items.is_empty();
            items.extend(page.items);
            if !more {
                break;
            }
            query.page += 1;
        }
        tracing::debug!(count = items.len(), "Listed all");
        Ok(items)
    }
}
