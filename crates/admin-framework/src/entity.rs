//! # ResourceEntity Trait
//!
//! The `ResourceEntity` trait defines the contract every administrable resource
//! (Endpoint, Provider, Flow, …) implements so the generic controllers can list,
//! load, submit and delete it. It specifies associated types for the id, the
//! create/update payload and the service-side context, and provides the hooks
//! the loopback service uses (`validate`, `used_by`).
//!
//! # Architecture Note
//! The list, form and bulk delete controllers are written *once* against this
//! trait. A `Provider` payload can never be sent to an `Endpoint` client; the
//! associated types make that a compile error.
//!
//! # Provided Methods (Hooks)
//! - [`ResourceEntity::metadata`] defaults to the display name only.
//! - [`ResourceEntity::matches_search`] defaults to a case-insensitive match on the display name.
//! - [`ResourceEntity::validate`] and [`ResourceEntity::used_by`] default to "nothing to report".
//! - [`ResourceEntity::on_delete`] defaults to doing nothing.

use crate::error::{ClientError, ValidationErrors};
use crate::query::SortKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// One key/value row describing an item in the delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// What happens to a dependent object when the referenced one is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsedByAction {
    Cascade,
    CascadeMany,
    SetNull,
    SetDefault,
}

/// One dependent object that references the item about to be deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedByEntry {
    pub resource_kind: String,
    pub resource_label: String,
    pub referencing_id: String,
    pub action: UsedByAction,
}

/// Trait that any administrable resource implements.
///
/// # Context
/// `Context` is injected into the loopback service at `run()` time, which lets
/// `used_by` and `validate` consult other resource services ("late binding").
/// Use `()` when there are no dependencies.
#[async_trait]
pub trait ResourceEntity: Clone + Debug + Send + Sync + 'static {
    /// Unique identifier. `From<u32>` lets the loopback service assign ids,
    /// `FromStr` lets form choices carry ids as strings.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + FromStr + From<u32>;

    /// Body of create and update requests.
    type Payload: Clone + Debug + Send + Sync;

    /// Dependencies available to the service-side hooks.
    type Context: Send + Sync;

    /// Human label for this kind of resource, e.g. `"Endpoint"`.
    const KIND: &'static str;

    /// Ordering applied when a query names none.
    const DEFAULT_ORDERING: &'static str = "name";

    /// Fields that break ties after the requested ordering, before the pk.
    const SECONDARY_ORDERING: &'static [&'static str] = &[];

    fn pk(&self) -> &Self::Id;

    fn display_name(&self) -> &str;

    /// Rows shown for this item in the bulk delete confirmation.
    fn metadata(&self) -> Vec<MetadataEntry> {
        vec![MetadataEntry::new("Name", self.display_name())]
    }

    /// Free-text search. `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool {
        self.display_name().to_lowercase().contains(needle)
    }

    /// Comparable value of `field`, `None` if the field is unknown.
    fn sort_key(&self, field: &str) -> Option<SortKey>;

    /// Build a new entity from a create payload.
    fn from_payload(id: Self::Id, payload: Self::Payload) -> Result<Self, ValidationErrors>;

    /// Replace this entity's state with an update payload.
    fn apply_payload(&mut self, payload: Self::Payload) -> Result<(), ValidationErrors>;

    /// Server-side validation, run before create and update are committed.
    async fn validate(&self, _ctx: &Self::Context) -> Result<(), ValidationErrors> {
        Ok(())
    }

    /// Other records that reference this one.
    async fn used_by(&self, _ctx: &Self::Context) -> Result<Vec<UsedByEntry>, ClientError> {
        Ok(Vec::new())
    }

    /// Runs before the loopback service removes this record. It applies the
    /// actions `used_by` announced; an error keeps the record in place.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), ClientError> {
        Ok(())
    }
}
