//! Entity trait implementation for the RAC provider domain type.

use crate::model::{Flow, FlowDesignation, FlowId, ProviderId, ProviderPayload, RacProvider};
use admin_framework::{
    ClientError, MetadataEntry, RemoteResource, ResourceClient, ResourceEntity, SortKey,
    ValidationErrors, REQUIRED_MESSAGE,
};
use async_trait::async_trait;

fn check(payload: &ProviderPayload) -> Result<FlowId, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if payload.name.trim().is_empty() {
        errors.add("name", REQUIRED_MESSAGE);
    }
    if payload.authorization_flow.is_none() {
        errors.add("authorization_flow", REQUIRED_MESSAGE);
    }
    errors.into_result()?;
    payload
        .authorization_flow
        .ok_or_else(|| ValidationErrors::field("authorization_flow", REQUIRED_MESSAGE))
}

#[async_trait]
impl ResourceEntity for RacProvider {
    type Id = ProviderId;
    type Payload = ProviderPayload;
    type Context = ResourceClient<Flow>;
    const KIND: &'static str = "RAC Provider";

    fn pk(&self) -> &ProviderId {
        &self.pk
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new("Name", &self.name),
            MetadataEntry::new("Client type", self.protocol.label()),
            MetadataEntry::new("Endpoints", self.endpoints.len().to_string()),
        ]
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.protocol.as_str().contains(needle)
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "pk" => Some(SortKey::Number(self.pk.0 as i64)),
            "name" => Some(SortKey::text(&self.name)),
            "protocol" => Some(SortKey::text(self.protocol.as_str())),
            "authorization_flow" => Some(SortKey::Number(self.authorization_flow.0 as i64)),
            _ => None,
        }
    }

    fn from_payload(pk: ProviderId, payload: ProviderPayload) -> Result<Self, ValidationErrors> {
        let authorization_flow = check(&payload)?;
        Ok(Self {
            pk,
            name: payload.name.trim().to_string(),
            authorization_flow,
            protocol: payload.protocol,
            endpoints: payload.endpoints,
            settings: payload.settings,
        })
    }

    fn apply_payload(&mut self, payload: ProviderPayload) -> Result<(), ValidationErrors> {
        *self = Self::from_payload(self.pk, payload)?;
        Ok(())
    }

    /// The authorization flow must exist and be an authorization flow.
    async fn validate(&self, flows: &ResourceClient<Flow>) -> Result<(), ValidationErrors> {
        let id = self.authorization_flow;
        match flows.retrieve(id).await {
            Ok(flow) if flow.designation == FlowDesignation::Authorization => Ok(()),
            Ok(flow) => Err(ValidationErrors::field(
                "authorization_flow",
                format!(
                    "Flow \"{}\" is designated for {}, not authorization.",
                    flow.slug,
                    flow.designation.as_str()
                ),
            )),
            Err(ClientError::NotFound(_)) => Err(ValidationErrors::field(
                "authorization_flow",
                format!("Invalid pk \"{id}\" - object does not exist."),
            )),
            Err(e) => {
                let mut errors = ValidationErrors::new();
                errors.add_non_field(format!("Could not verify authorization flow: {e}"));
                Err(errors)
            }
        }
    }
}
