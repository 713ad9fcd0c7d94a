//! # Loopback Resource Service
//!
//! This module defines the `ResourceActor`, an in-memory service that answers
//! [`ResourceRequest`]s the way the remote API would. It backs the demo binary
//! and the integration tests; it is not a storage engine.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::ClientError;
use crate::message::ResourceRequest;
use crate::query::{ListQuery, Ordering, Page};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// ## ResourceActor
///
/// The `ResourceActor<T>` owns the store for one entity type and processes all
/// incoming requests *sequentially* in its own Tokio task, so the store needs no
/// locking.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the service and its client.
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// ```rust,ignore
/// let (endpoint_actor, endpoints) = ResourceActor::<Endpoint>::new(32);
/// tokio::spawn(endpoint_actor.run(provider_client.clone()));
/// let page = endpoints.list(ListQuery::new(20)).await?;
/// ```
///
/// # Operations
///
/// * **List**: search (`matches_search`), exact-match filters (`sort_key`),
///   ordering (query ordering or `DEFAULT_ORDERING`, ties broken by id), then
///   the requested page slice.
/// * **Retrieve**: a clone of the stored entity, or `NotFound`.
/// * **Create**: assigns the next sequential id, builds the entity from the
///   payload, runs `validate`, stores it and returns it.
/// * **Update**: applies the payload to a *copy*, runs `validate`, and only then
///   replaces the stored entity. A rejected update leaves the store untouched.
/// * **Delete**: runs the entity's `on_delete` hook, then removes it, or `NotFound`.
/// * **UsedBy**: runs the entity's `used_by` hook against the injected context.
pub struct ResourceActor<T: ResourceEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ResourceEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when
    /// it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the service loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let kind = T::KIND;
        info!(kind, "Resource service started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { query, respond_to } => {
                    let page = self.list(&query);
                    debug!(kind, ?query, returned = page.items.len(), total = page.total_count, "List");
                    let _ = respond_to.send(Ok(page));
                }
                ResourceRequest::Retrieve { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(kind, %id, found = item.is_some(), "Retrieve");
                    let _ = respond_to.send(item.ok_or_else(|| ClientError::NotFound(id.to_string())));
                }
                ResourceRequest::Create {
                    payload,
                    respond_to,
                } => {
                    debug!(kind, ?payload, "Create");
                    let id = T::Id::from(self.next_id);
                    let item = match T::from_payload(id.clone(), payload) {
                        Ok(item) => item,
                        Err(errors) => {
                            warn!(kind, error = %errors, "Create rejected");
                            let _ = respond_to.send(Err(ClientError::Rejected(errors)));
                            continue;
                        }
                    };
                    if let Err(errors) = item.validate(&context).await {
                        warn!(kind, error = %errors, "Create rejected");
                        let _ = respond_to.send(Err(ClientError::Rejected(errors)));
                        continue;
                    }
                    self.next_id += 1;
                    self.store.insert(id.clone(), item.clone());
                    info!(kind, %id, size = self.store.len(), "Created");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    payload,
                    respond_to,
                } => {
                    debug!(kind, %id, ?payload, "Update");
                    let Some(mut candidate) = self.store.get(&id).cloned() else {
                        warn!(kind, %id, "Not found");
                        let _ = respond_to.send(Err(ClientError::NotFound(id.to_string())));
                        continue;
                    };
                    let applied = match candidate.apply_payload(payload) {
                        Ok(()) => candidate.validate(&context).await,
                        Err(errors) => Err(errors),
                    };
                    if let Err(errors) = applied {
                        warn!(kind, %id, error = %errors, "Update rejected");
                        let _ = respond_to.send(Err(ClientError::Rejected(errors)));
                        continue;
                    }
                    self.store.insert(id.clone(), candidate.clone());
                    info!(kind, %id, "Updated");
                    let _ = respond_to.send(Ok(candidate));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(kind, %id, "Delete");
                    let Some(item) = self.store.get(&id).cloned() else {
                        warn!(kind, %id, "Not found");
                        let _ = respond_to.send(Err(ClientError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(kind, %id, error = %e, "Delete aborted");
                        let _ = respond_to.send(Err(e));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(kind, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::UsedBy { id, respond_to } => {
                    debug!(kind, %id, "UsedBy");
                    let Some(item) = self.store.get(&id).cloned() else {
                        warn!(kind, %id, "Not found");
                        let _ = respond_to.send(Err(ClientError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item.used_by(&context).await;
                    if let Err(e) = &result {
                        warn!(kind, %id, error = %e, "UsedBy failed");
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(kind, size = self.store.len(), "Shutdown");
    }

    fn list(&self, query: &ListQuery) -> Page<T> {
        let needle = query.search.trim().to_lowercase();
        let mut matches: Vec<&T> = self
            .store
            .values()
            .filter(|item| needle.is_empty() || item.matches_search(&needle))
            .filter(|item| {
                query.filters.iter().all(|(field, value)| {
                    item.sort_key(field)
                        .map(|key| key.matches(value))
                        .unwrap_or(false)
                })
            })
            .collect();

        let ordering = query
            .ordering
            .clone()
            .unwrap_or_else(|| Ordering::parse(T::DEFAULT_ORDERING));
        matches.sort_by(|a, b| {
            let by_field = a
                .sort_key(&ordering.field)
                .cmp(&b.sort_key(&ordering.field))
                .then_with(|| {
                    T::SECONDARY_ORDERING
                        .iter()
                        .filter(|field| **field != ordering.field)
                        .map(|field| a.sort_key(field).cmp(&b.sort_key(field)))
                        .find(|order| order.is_ne())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.pk().cmp(b.pk()));
            if ordering.descending {
                by_field.reverse()
            } else {
                by_field
            }
        });

        let page_size = query.page_size.max(1);
        let total_count = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.offset())
            .take(page_size as usize)
            .cloned()
            .collect();
        Page {
            items,
            total_count,
            page_number: query.page.max(1),
            page_size,
        }
    }
}
