//! # Admin Framework
//!
//! This crate provides the generic building blocks of an admin console: a
//! paginated list, a bulk delete flow and a model form, written once against a
//! [`ResourceEntity`] and a [`RemoteResource`] client and reused for every
//! resource type the console manages.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Entity Layer** ([`ResourceEntity`]) - The resource type: its id, payload, search and ordering keys
//! 2. **Interface Layer** ([`RemoteResource`], [`ResourceClient`]) - Async CRUD plus used-by against the remote API
//! 3. **Controller Layer** ([`ListController`], [`BulkDelete`], [`FormController`]) - UI state and the fetch cycle
//!
//! [`ResourceActor`] is a loopback implementation of the remote side: an
//! in-memory service reached through a [`ResourceClient`]. The demo and the
//! integration tests run against it.
//!
//! ## Controllers
//!
//! Controllers own their state exclusively and never block. A command
//! (`set_page`, `submit`, `begin_load`, …) spawns its remote call into a
//! `JoinSet` the controller owns and returns at once; `next_event()` /
//! `settle()` applies the next completion. Dropping a controller aborts
//! everything it had in flight, so a late result is never applied to a
//! controller that is gone.
//!
//! - **List**: last-query-wins. Each query change bumps a generation; a result
//!   for an older generation is discarded.
//! - **Bulk delete**: [`BulkDelete::review`] resolves used-by for every item
//!   concurrently, and only [`DeleteReview::confirm`] issues deletes.
//! - **Form**: `Unloaded -> Loading -> Ready -> Submitting -> Succeeded`. A
//!   rejected submit returns to `Ready` with the entered values intact.
//!
//! ## Example
//!
//! ```rust
//! use admin_framework::{
//!     ClientError, ListQuery, RemoteResource, ResourceActor, ResourceEntity, SortKey,
//!     ValidationErrors,
//! };
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Tag {
//!     pk: u32,
//!     name: String,
//! }
//!
//! #[async_trait]
//! impl ResourceEntity for Tag {
//!     type Id = u32;
//!     type Payload = String;
//!     type Context = ();
//!     const KIND: &'static str = "Tag";
//!
//!     fn pk(&self) -> &u32 { &self.pk }
//!     fn display_name(&self) -> &str { &self.name }
//!     fn sort_key(&self, field: &str) -> Option<SortKey> {
//!         (field == "name").then(|| SortKey::text(&self.name))
//!     }
//!     fn from_payload(pk: u32, name: String) -> Result<Self, ValidationErrors> {
//!         Ok(Self { pk, name })
//!     }
//!     fn apply_payload(&mut self, name: String) -> Result<(), ValidationErrors> {
//!         self.name = name;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ClientError> {
//!     let (actor, tags) = ResourceActor::<Tag>::new(8);
//!     tokio::spawn(actor.run(()));
//!
//!     tags.create("beta".to_string()).await?;
//!     tags.create("alpha".to_string()).await?;
//!
//!     let page = tags.list(ListQuery::new(20)).await?;
//!     let names: Vec<_> = page.items.iter().map(|t| t.name.as_str()).collect();
//!     assert_eq!(names, ["alpha", "beta"]);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a `MockClient` with a fluent expectation queue,
//! and raw helpers that hand the test each request together with its
//! responder, so completions can be delivered out of order or not at all.

pub mod actor;
pub mod bulk_delete;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod field;
pub mod form;
pub mod list;
pub mod message;
pub mod mock;
pub mod query;
pub mod remote;
pub mod selection;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use bulk_delete::{BulkDelete, BulkDeleteReport, DeleteCandidate, DeleteReview};
pub use client::ResourceClient;
pub use config::{ConfigError, PaginationConfig, UiConfig, PER_PAGE_ENV};
pub use entity::{MetadataEntry, ResourceEntity, UsedByAction, UsedByEntry};
pub use error::{AdminError, ClientError, Failure, Operation, ValidationErrors};
pub use field::{
    check_required, AuxiliaryData, Choice, ChoiceSet, FieldKind, FieldSpec, FieldValue,
    FormValues, REQUIRED_MESSAGE,
};
pub use form::{
    CompletionSender, FormController, FormEvent, FormMode, FormOutcome, FormPhase, FormRender,
    FormSchema,
};
pub use list::{Cell, Column, ListController, ListEvent, ListView, RowAction, RowRender, TableRender};
pub use message::{ResourceRequest, Response};
pub use query::{ListQuery, Ordering, Page, SortKey};
pub use remote::RemoteResource;
pub use selection::SelectionSet;
