#![allow(dead_code)]

use admin_framework::{Page, RemoteResource, UiConfig};
use rac_admin::lifecycle::RacConsole;
use rac_admin::model::{
    AuthMode, Endpoint, EndpointId, EndpointPayload, FlowDesignation, FlowId, FlowPayload,
    Protocol,
};
use rac_admin::settings::Settings;

pub fn endpoint(pk: u32, name: &str, protocol: Protocol) -> Endpoint {
    Endpoint {
        pk: EndpointId(pk),
        name: name.to_string(),
        protocol,
        host: format!("{name}.internal"),
        settings: Settings::new(),
        property_mappings: Vec::new(),
        auth_mode: AuthMode::Prompt,
    }
}

pub fn page_of<T>(items: Vec<T>) -> Page<T> {
    Page {
        total_count: items.len() as u64,
        items,
        page_number: 1,
        page_size: 20,
    }
}

/// A console with one authorization flow and the named endpoints, in order.
pub async fn seeded_console(endpoints: &[&str]) -> (RacConsole, FlowId, Vec<EndpointId>) {
    let console = RacConsole::new(UiConfig::default());
    let flow = console
        .flows
        .create(FlowPayload::new(
            "default-provider-authorization",
            "Authorize",
            FlowDesignation::Authorization,
        ))
        .await
        .unwrap();
    let mut ids = Vec::new();
    for name in endpoints {
        let created = console
            .endpoints
            .create(EndpointPayload::new(*name, Protocol::Rdp, format!("{name}.internal")))
            .await
            .unwrap();
        ids.push(created.pk);
    }
    (console, flow.pk, ids)
}
