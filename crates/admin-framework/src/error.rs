//! # Framework Errors
//!
//! This module defines the error types shared by every controller and client.
//! Remote clients report [`ClientError`]; controllers translate those into the
//! console taxonomy ([`AdminError`]) and attribute each one to the
//! [`Operation`] that caused it ([`Failure`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation problems, shaped like the server's validation payload.
///
/// Messages under a field name belong to that field; `non_field` holds
/// messages that apply to the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub non_field: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single field message.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(name, message);
        errors
    }

    pub fn add(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(name.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Merges `other` into `self`.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (name, messages) in other.fields {
            self.fields.entry(name).or_default().extend(messages);
        }
        self.non_field.extend(other.non_field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// Messages recorded for `name`, empty if the field is clean.
    pub fn messages_for(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.non_field.clone();
        for (name, messages) in &self.fields {
            for message in messages {
                parts.push(format!("{name}: {message}"));
            }
        }
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors reported by a remote resource client.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    #[error("Resource service unavailable")]
    Unavailable,
    #[error("Resource service dropped the response channel")]
    Dropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected by server: {0}")]
    Rejected(ValidationErrors),
    #[error("Remote error: {0}")]
    Remote(String),
}

/// The console error taxonomy.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdminError {
    /// Local or server-reported field problems; the form stays open.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),
    /// The referenced entity no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Network, authorization or server fault.
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(String),
    /// Reference data for a single field could not be loaded.
    #[error("Failed to load {kind}: {message}")]
    AuxiliaryLoad { kind: String, message: String },
    #[error("Nothing selected")]
    EmptySelection,
    #[error("A submit is already in flight")]
    SubmitInFlight,
    #[error("Form is not ready")]
    NotReady,
}

impl From<ClientError> for AdminError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::NotFound(what) => AdminError::NotFound(what),
            ClientError::Rejected(errors) => AdminError::Validation(errors),
            other => AdminError::RemoteFetch(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors)
    }
}

/// The user-visible action an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    ListRefresh,
    Load,
    Submit,
    UsedBy,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::ListRefresh => "list refresh",
            Operation::Load => "load",
            Operation::Submit => "submit",
            Operation::UsedBy => "used-by lookup",
            Operation::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// An error attributed to the operation that produced it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{operation} failed: {error}")]
pub struct Failure {
    pub operation: Operation,
    pub error: AdminError,
}

impl Failure {
    pub fn new(operation: Operation, error: impl Into<AdminError>) -> Self {
        Self {
            operation,
            error: error.into(),
        }
    }
}
