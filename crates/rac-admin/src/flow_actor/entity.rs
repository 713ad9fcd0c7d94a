use crate::model::{Flow, FlowId, FlowPayload};
use admin_framework::{ResourceEntity, SortKey, ValidationErrors, REQUIRED_MESSAGE};
use async_trait::async_trait;

#[async_trait]
impl ResourceEntity for Flow {
    type Id = FlowId;
    type Payload = FlowPayload;
    type Context = ();
    const KIND: &'static str = "Flow";
    const DEFAULT_ORDERING: &'static str = "slug";

    fn pk(&self) -> &FlowId {
        &self.pk
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.slug.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "pk" => Some(SortKey::Number(self.pk.0 as i64)),
            "slug" => Some(SortKey::text(&self.slug)),
            "name" => Some(SortKey::text(&self.name)),
            "designation" => Some(SortKey::text(self.designation.as_str())),
            _ => None,
        }
    }

    fn from_payload(pk: FlowId, payload: FlowPayload) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if payload.slug.trim().is_empty() {
            errors.add("slug", REQUIRED_MESSAGE);
        }
        if payload.name.trim().is_empty() {
            errors.add("name", REQUIRED_MESSAGE);
        }
        errors.into_result()?;
        Ok(Self {
            pk,
            slug: payload.slug,
            name: payload.name,
            designation: payload.designation,
        })
    }

    fn apply_payload(&mut self, payload: FlowPayload) -> Result<(), ValidationErrors> {
        *self = Self::from_payload(self.pk, payload)?;
        Ok(())
    }
}
