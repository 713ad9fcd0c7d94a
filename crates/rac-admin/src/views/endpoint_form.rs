//! Create/update form for a single endpoint.

use super::{options, parse_choice};
use crate::model::{AuthMode, Endpoint, EndpointPayload, Protocol};
use crate::settings::{from_yaml, to_yaml, Settings};
use admin_framework::{
    AuxiliaryData, FieldSpec, FormMode, FormSchema, FormValues, ValidationErrors,
};

pub struct EndpointForm;

impl FormSchema for EndpointForm {
    type Model = Endpoint;

    fn fields(&self, instance: Option<&Endpoint>, _auxiliary: &AuxiliaryData) -> Vec<FieldSpec> {
        let protocol = instance.map_or(Protocol::Rdp, |e| e.protocol);
        let auth_mode = instance.map_or(AuthMode::Prompt, |e| e.auth_mode);
        let settings = instance.map_or_else(|| to_yaml(&Settings::new()), |e| to_yaml(&e.settings));
        vec![
            FieldSpec::text("name", "Name", instance.map_or("", |e| e.name.as_str())).required(),
            FieldSpec::radio(
                "protocol",
                "Protocol",
                options(&Protocol::ALL, Protocol::as_str, Protocol::label),
                Some(protocol.as_str().to_string()),
            )
            .required(),
            FieldSpec::text("host", "Host", instance.map_or("", |e| e.host.as_str()))
                .required()
                .help("Hostname/IP to connect to."),
            FieldSpec::radio(
                "auth_mode",
                "Authentication mode",
                options(&AuthMode::ALL, AuthMode::as_str, AuthMode::label),
                Some(auth_mode.as_str().to_string()),
            ),
            FieldSpec::code("settings", "Settings", "yaml", settings).help("Connection settings."),
        ]
    }

    fn payload(
        &self,
        values: &FormValues,
        instance: Option<&Endpoint>,
    ) -> Result<EndpointPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let protocol = parse_choice(values, "protocol", &mut errors);
        let auth_mode = parse_choice(values, "auth_mode", &mut errors);
        let settings = match from_yaml("settings", &values.text("settings")) {
            Ok(settings) => settings,
            Err(e) => {
                errors.extend(e);
                Settings::new()
            }
        };
        errors.into_result()?;
        Ok(EndpointPayload {
            name: values.text("name"),
            protocol: protocol.unwrap_or(Protocol::Rdp),
            host: values.text("host"),
            settings,
            property_mappings: instance
                .map(|e| e.property_mappings.clone())
                .unwrap_or_default(),
            auth_mode: auth_mode.unwrap_or(AuthMode::Prompt),
        })
    }

    fn success_message(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Edit => "Successfully updated endpoint.".to_string(),
            FormMode::Create => "Successfully created endpoint.".to_string(),
        }
    }
}
