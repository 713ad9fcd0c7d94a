use super::{EndpointId, FlowId, Protocol};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::num::ParseIntError;
use std::str::FromStr;

/// Type-safe identifier for RAC providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub u32);

impl From<u32> for ProviderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProviderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A remote access provider: the set of endpoints users may reach after
/// passing its authorization flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RacProvider {
    pub pk: ProviderId,
    pub name: String,
    pub authorization_flow: FlowId,
    pub protocol: Protocol,
    pub endpoints: BTreeSet<EndpointId>,
    pub settings: Settings,
}

/// Create/update body for a provider.
///
/// `endpoints` is the complete association list; an update replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPayload {
    pub name: String,
    pub authorization_flow: Option<FlowId>,
    pub protocol: Protocol,
    pub endpoints: BTreeSet<EndpointId>,
    pub settings: Settings,
}

impl ProviderPayload {
    pub fn new(name: impl Into<String>, authorization_flow: FlowId) -> Self {
        Self {
            name: name.into(),
            authorization_flow: Some(authorization_flow),
            protocol: Protocol::Rdp,
            endpoints: BTreeSet::new(),
            settings: Settings::new(),
        }
    }

    pub fn with_endpoints(mut self, endpoints: impl IntoIterator<Item = EndpointId>) -> Self {
        self.endpoints = endpoints.into_iter().collect();
        self
    }
}

/// Full-replace payload carrying the provider's current state.
impl From<&RacProvider> for ProviderPayload {
    fn from(provider: &RacProvider) -> Self {
        Self {
            name: provider.name.clone(),
            authorization_flow: Some(provider.authorization_flow),
            protocol: provider.protocol,
            endpoints: provider.endpoints.clone(),
            settings: provider.settings.clone(),
        }
    }
}
