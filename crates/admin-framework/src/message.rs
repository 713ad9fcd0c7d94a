//! # Generic Messages
//!
//! This module defines the request type carried from a [`ResourceClient`](crate::ResourceClient)
//! to the loopback [`ResourceActor`](crate::ResourceActor).

use crate::entity::{ResourceEntity, UsedByEntry};
use crate::error::ClientError;
use crate::query::{ListQuery, Page};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the service.
pub type Response<T> = oneshot::Sender<Result<T, ClientError>>;

/// A request to a resource service.
///
/// The variants mirror the remote resource operations one to one: list,
/// retrieve, create, update, delete and used-by. Every variant carries its own
/// typed responder, so a `Retrieve` can only ever be answered with a `T`.
#[derive(Debug)]
pub enum ResourceRequest<T: ResourceEntity> {
    List {
        query: ListQuery,
        respond_to: Response<Page<T>>,
    },
    Retrieve {
        id: T::Id,
        respond_to: Response<T>,
    },
    Create {
        payload: T::Payload,
        respond_to: Response<T>,
    },
    Update {
        id: T::Id,
        payload: T::Payload,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    UsedBy {
        id: T::Id,
        respond_to: Response<Vec<UsedByEntry>>,
    },
}

impl<T: ResourceEntity> ResourceRequest<T> {
    /// Short operation name, used in logs and mock diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceRequest::List { .. } => "list",
            ResourceRequest::Retrieve { .. } => "retrieve",
            ResourceRequest::Create { .. } => "create",
            ResourceRequest::Update { .. } => "update",
            ResourceRequest::Delete { .. } => "delete",
            ResourceRequest::UsedBy { .. } => "used_by",
        }
    }
}
