//! # Generic Client
//!
//! This module defines the channel-backed client for a resource service.

use crate::entity::{ResourceEntity, UsedByEntry};
use crate::error::ClientError;
use crate::message::ResourceRequest;
use crate::query::{ListQuery, Page};
use crate::remote::RemoteResource;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` forwards remote resource operations over a Tokio
/// mpsc channel and receives each answer on its own oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every method resolves to `Result<…, ClientError>`.
/// * **Generic** – works with any entity that implements `ResourceEntity`.
pub struct ResourceClient<T: ResourceEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Derive would demand `T: Clone` bounds on the request type.
impl<T: ResourceEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ResourceEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R: Send>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, ClientError>>) -> ResourceRequest<T> + Send,
    ) -> Result<R, ClientError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| ClientError::Unavailable)?;
        response.await.map_err(|_| ClientError::Dropped)?
    }
}

#[async_trait]
impl<T: ResourceEntity> RemoteResource<T> for ResourceClient<T> {
    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn list(&self, query: ListQuery) -> Result<Page<T>, ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::List { query, respond_to })
            .await
    }

    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn retrieve(&self, id: T::Id) -> Result<T, ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::Retrieve { id, respond_to })
            .await
    }

    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn create(&self, payload: T::Payload) -> Result<T, ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::Create {
            payload,
            respond_to,
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn update(&self, id: T::Id, payload: T::Payload) -> Result<T, ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::Update {
            id,
            payload,
            respond_to,
        })
        .await
    }

    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, id: T::Id) -> Result<(), ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    #[tracing::instrument(skip(self), fields(kind = T::KIND))]
    async fn used_by(&self, id: T::Id) -> Result<Vec<UsedByEntry>, ClientError> {
        tracing::debug!("Sending request");
        self.request(|respond_to| ResourceRequest::UsedBy { id, respond_to })
            .await
    }
}
