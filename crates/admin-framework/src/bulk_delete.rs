//! # Bulk Delete
//!
//! Deleting the selected rows is a two-step protocol encoded in the types:
//!
//! 1. [`BulkDelete::review`] resolves each item's metadata and its used-by list
//!    concurrently and returns a [`DeleteReview`] for the user to confirm.
//! 2. Only [`DeleteReview::confirm`] issues delete calls, one per item,
//!    concurrently. Each outcome is recorded on its own; one failure never
//!    aborts or rolls back the others.
//!
//! Because `confirm` only exists on `DeleteReview`, no destructive call can
//! be made before the review step.

use crate::entity::{MetadataEntry, ResourceEntity, UsedByEntry};
use crate::error::{AdminError, Failure, Operation};
use crate::remote::RemoteResource;
use futures::future::join_all;
use std::fmt;
use tracing::{info, instrument, warn};

/// Selected items waiting for review.
pub struct BulkDelete<T: ResourceEntity, C: RemoteResource<T>> {
    client: C,
    items: Vec<T>,
}

impl<T: ResourceEntity, C: RemoteResource<T>> BulkDelete<T, C> {
    /// Fails with [`AdminError::EmptySelection`] when `items` is empty.
    pub fn new(client: C, items: Vec<T>) -> Result<Self, AdminError> {
        if items.is_empty() {
            return Err(AdminError::EmptySelection);
        }
        Ok(Self { client, items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up what references each item. A failed lookup is kept on the
    /// candidate; it does not stop the review.
    #[instrument(skip(self), fields(kind = T::KIND, count = self.items.len()))]
    pub async fn review(self) -> DeleteReview<T, C> {
        let client = &self.client;
        let lookups = self.items.iter().map(|item| async move {
            let used_by = client
                .used_by(item.pk().clone())
                .await
                .map_err(|e| Failure::new(Operation::UsedBy, e));
            if let Err(failure) = &used_by {
                warn!(id = %item.pk(), error = %failure, "Used-by lookup failed");
            }
            used_by
        });
        let used_by = join_all(lookups).await;

        let candidates = self
            .items
            .into_iter()
            .zip(used_by)
            .map(|(item, used_by)| DeleteCandidate {
                metadata: item.metadata(),
                item,
                used_by,
            })
            .collect();
        DeleteReview {
            client: self.client,
            candidates,
        }
    }
}

/// One item as shown in the delete confirmation.
#[derive(Debug, Clone)]
pub struct DeleteCandidate<T: ResourceEntity> {
    pub item: T,
    pub metadata: Vec<MetadataEntry>,
    pub used_by: Result<Vec<UsedByEntry>, Failure>,
}

/// The confirmation step. Dropping it (or calling [`DeleteReview::cancel`])
/// deletes nothing.
pub struct DeleteReview<T: ResourceEntity, C: RemoteResource<T>> {
    client: C,
    candidates: Vec<DeleteCandidate<T>>,
}

impl<T: ResourceEntity, C: RemoteResource<T>> DeleteReview<T, C> {
    pub fn candidates(&self) -> &[DeleteCandidate<T>] {
        &self.candidates
    }

    /// Label for the confirmation dialog, e.g. `"Endpoint(s)"`.
    pub fn object_label(&self) -> String {
        format!("{}(s)", T::KIND)
    }

    /// Total number of dependent objects across all candidates.
    pub fn dependent_count(&self) -> usize {
        self.candidates
            .iter()
            .filter_map(|c| c.used_by.as_ref().ok())
            .map(Vec::len)
            .sum()
    }

    pub fn cancel(self) {
        info!(kind = T::KIND, count = self.candidates.len(), "Bulk delete cancelled");
    }

    /// Issues one delete per candidate and waits for all of them to settle.
    #[instrument(skip(self), fields(kind = T::KIND, count = self.candidates.len()))]
    pub async fn confirm(self) -> BulkDeleteReport<T::Id> {
        let client = &self.client;
        let deletes = self.candidates.iter().map(|candidate| async move {
            let id = candidate.item.pk().clone();
            let result = client.delete(id.clone()).await;
            (id, result)
        });

        let mut report = BulkDeleteReport::new();
        for (id, result) in join_all(deletes).await {
            match result {
                Ok(()) => report.succeeded.push(id),
                Err(e) => {
                    warn!(%id, error = %e, "Delete failed");
                    report.failed.push((id, Failure::new(Operation::Delete, e)));
                }
            }
        }
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Bulk delete finished"
        );
        report
    }
}

/// Outcome of a confirmed bulk delete.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDeleteReport<Id> {
    pub succeeded: Vec<Id>,
    pub failed: Vec<(Id, Failure)>,
}

impl<Id> Default for BulkDeleteReport<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> BulkDeleteReport<Id> {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl<Id> fmt::Display for BulkDeleteReport<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} deleted, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )
    }
}
