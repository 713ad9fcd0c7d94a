//! Create/update form for a RAC provider.
//!
//! The authorization flow and endpoint choices are auxiliary data: if one of
//! them fails to load, only that field is degraded. Endpoints use replace
//! semantics: the submitted set is the full association list.

use super::{options, parse_choice};
use crate::model::{
    Endpoint, EndpointId, Flow, FlowDesignation, Protocol, ProviderPayload, RacProvider,
};
use crate::settings::{from_yaml, to_yaml, Settings};
use admin_framework::{
    AuxiliaryData, Choice, ClientError, FieldSpec, FormMode, FormSchema, FormValues, ListQuery,
    RemoteResource, ValidationErrors,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

pub const FLOWS: &str = "flows";
pub const ENDPOINTS: &str = "endpoints";

pub struct ProviderForm<F, E> {
    flows: F,
    endpoints: E,
}

impl<F: RemoteResource<Flow>, E: RemoteResource<Endpoint>> ProviderForm<F, E> {
    pub fn new(flows: F, endpoints: E) -> Self {
        Self { flows, endpoints }
    }
}

#[async_trait]
impl<F: RemoteResource<Flow>, E: RemoteResource<Endpoint>> FormSchema for ProviderForm<F, E> {
    type Model = RacProvider;

    fn auxiliary_kinds(&self) -> Vec<&'static str> {
        vec![FLOWS, ENDPOINTS]
    }

    async fn load_auxiliary(&self, kind: &str) -> Result<Vec<Choice>, ClientError> {
        debug!(kind, "Loading choices");
        match kind {
            FLOWS => {
                let query = ListQuery::new(100)
                    .with_filter("designation", FlowDesignation::Authorization.as_str());
                let flows = self.flows.list_all(query).await?;
                Ok(flows
                    .into_iter()
                    .map(|flow| Choice::new(flow.pk.to_string(), format!("{} ({})", flow.name, flow.slug)))
                    .collect())
            }
            ENDPOINTS => {
                let endpoints = self.endpoints.list_all(ListQuery::new(100)).await?;
                Ok(endpoints
                    .into_iter()
                    .map(|endpoint| Choice::new(endpoint.pk.to_string(), endpoint.name))
                    .collect())
            }
            other => Err(ClientError::Remote(format!("unknown choice source {other}"))),
        }
    }

    fn fields(&self, instance: Option<&RacProvider>, auxiliary: &AuxiliaryData) -> Vec<FieldSpec> {
        let flow = instance.map(|p| p.authorization_flow.to_string());
        let protocol = instance.map_or(Protocol::Rdp, |p| p.protocol);
        let endpoints: BTreeSet<String> = instance
            .map(|p| p.endpoints.iter().map(ToString::to_string).collect())
            .unwrap_or_default();
        let settings = instance.map_or_else(|| to_yaml(&Settings::new()), |p| to_yaml(&p.settings));
        vec![
            FieldSpec::text("name", "Name", instance.map_or("", |p| p.name.as_str())).required(),
            FieldSpec::select(
                "authorization_flow",
                "Authorization flow",
                auxiliary.choices(FLOWS),
                flow,
            )
            .required()
            .help("Flow used when authorizing this provider."),
            FieldSpec::radio(
                "protocol",
                "Client type",
                options(&Protocol::ALL, Protocol::as_str, Protocol::label),
                Some(protocol.as_str().to_string()),
            )
            .required(),
            FieldSpec::multi_select("endpoints", "Endpoints", auxiliary.choices(ENDPOINTS), endpoints)
                .required()
                .help("Select any endpoints that users should be able to connect to with this provider.")
                .help("Hold control/command to select multiple items."),
            FieldSpec::code("settings", "Settings", "yaml", settings).help("Connection settings."),
        ]
    }

    fn payload(
        &self,
        values: &FormValues,
        _instance: Option<&RacProvider>,
    ) -> Result<ProviderPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let authorization_flow = parse_choice(values, "authorization_flow", &mut errors);
        let protocol = parse_choice(values, "protocol", &mut errors);

        let mut endpoints = BTreeSet::new();
        for raw in values.many("endpoints") {
            match raw.parse::<EndpointId>() {
                Ok(id) => {
                    endpoints.insert(id);
                }
                Err(_) => errors.add("endpoints", format!("\"{raw}\" is not a valid choice.")),
            }
        }

        let settings = match from_yaml("settings", &values.text("settings")) {
            Ok(settings) => settings,
            Err(e) => {
                errors.extend(e);
                Settings::new()
            }
        };
        errors.into_result()?;

        Ok(ProviderPayload {
            name: values.text("name"),
            authorization_flow,
            protocol: protocol.unwrap_or(Protocol::Rdp),
            endpoints,
            settings,
        })
    }

    fn success_message(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Edit => "Successfully updated provider.".to_string(),
            FormMode::Create => "Successfully created provider.".to_string(),
        }
    }
}
