use super::{AuthMode, Protocol};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for Endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EndpointId(pub u32);

impl From<u32> for EndpointId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EndpointId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A host users can remotely connect to through a RAC provider.
///
/// Managed by a [`ResourceActor`](admin_framework::ResourceActor); see
/// [`crate::endpoint_actor`] for the entity implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub pk: EndpointId,
    pub name: String,
    pub protocol: Protocol,
    pub host: String,
    pub settings: Settings,
    pub property_mappings: Vec<String>,
    pub auth_mode: AuthMode,
}

/// Create/update body for an endpoint. Updates replace every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointPayload {
    pub name: String,
    pub protocol: Protocol,
    pub host: String,
    pub settings: Settings,
    pub property_mappings: Vec<String>,
    pub auth_mode: AuthMode,
}

impl EndpointPayload {
    pub fn new(name: impl Into<String>, protocol: Protocol, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocol,
            host: host.into(),
            settings: Settings::new(),
            property_mappings: Vec::new(),
            auth_mode: AuthMode::Prompt,
        }
    }
}
