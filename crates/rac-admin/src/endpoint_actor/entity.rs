//! Entity trait implementation for the Endpoint domain type.
//!
//! Search covers name and protocol, the default ordering is by name, and the
//! delete confirmation shows name, protocol and host. Deleting an endpoint
//! removes it from the providers that list it.

use crate::model::{Endpoint, EndpointId, EndpointPayload, ProviderPayload, RacProvider};
use admin_framework::{
    ClientError, ListQuery, MetadataEntry, RemoteResource, ResourceClient, ResourceEntity, SortKey,
    UsedByAction, UsedByEntry, ValidationErrors, REQUIRED_MESSAGE,
};
use async_trait::async_trait;
use tracing::debug;

fn check(payload: &EndpointPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if payload.name.trim().is_empty() {
        errors.add("name", REQUIRED_MESSAGE);
    }
    if payload.host.trim().is_empty() {
        errors.add("host", REQUIRED_MESSAGE);
    }
    errors.into_result()
}

#[async_trait]
impl ResourceEntity for Endpoint {
    type Id = EndpointId;
    type Payload = EndpointPayload;
    type Context = ResourceClient<RacProvider>;
    const KIND: &'static str = "Endpoint";
    const SECONDARY_ORDERING: &'static [&'static str] = &["protocol"];

    fn pk(&self) -> &EndpointId {
        &self.pk
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> Vec<MetadataEntry> {
        vec![
            MetadataEntry::new("Name", &self.name),
            MetadataEntry::new("Protocol", self.protocol.label()),
            MetadataEntry::new("Host", &self.host),
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
            "host" => Some(SortKey::text(&self.host)),
            "auth_mode" => Some(SortKey::text(self.auth_mode.as_str())),
            _ => None,
        }
    }

    fn from_payload(pk: EndpointId, payload: EndpointPayload) -> Result<Self, ValidationErrors> {
        check(&payload)?;
        Ok(Self {
            pk,
            name: payload.name.trim().to_string(),
            protocol: payload.protocol,
            host: payload.host.trim().to_string(),
            settings: payload.settings,
            property_mappings: payload.property_mappings,
            auth_mode: payload.auth_mode,
        })
    }

    fn apply_payload(&mut self, payload: EndpointPayload) -> Result<(), ValidationErrors> {
        *self = Self::from_payload(self.pk, payload)?;
        Ok(())
    }

    /// Every provider that lists this endpoint.
    async fn used_by(
        &self,
        providers: &ResourceClient<RacProvider>,
    ) -> Result<Vec<UsedByEntry>, ClientError> {
        let all = providers.list_all(ListQuery::new(100)).await?;
        Ok(all
            .into_iter()
            .filter(|provider| provider.endpoints.contains(&self.pk))
            .map(|provider| UsedByEntry {
                resource_kind: RacProvider::KIND.to_string(),
                resource_label: provider.name,
                referencing_id: provider.pk.to_string(),
                action: UsedByAction::CascadeMany,
            })
            .collect())
    }

    /// Drops this endpoint from every provider that lists it.
    async fn on_delete(&self, providers: &ResourceClient<RacProvider>) -> Result<(), ClientError> {
        let all = providers.list_all(ListQuery::new(100)).await?;
        for provider in all.into_iter().filter(|p| p.endpoints.contains(&self.pk)) {
            let mut payload = ProviderPayload::from(&provider);
            payload.endpoints.remove(&self.pk);
            debug!(endpoint = %self.pk, provider = %provider.pk, "Removing from provider");
            providers.update(provider.pk, payload).await?;
        }
        Ok(())
    }
}
