//! # RAC Admin Console
//!
//! Runs the remote access pages of the admin console against in-memory
//! services and walks through a typical session:
//!
//! 1. Seeding flows, endpoints and a provider.
//! 2. Mounting the Endpoints list and creating an endpoint from it.
//! 3. Reviewing and confirming a bulk delete.
//! 4. Editing the provider's endpoint set.
//!
//! Pagination comes from `rac-admin.toml` (if present) and `RAC_ADMIN_PER_PAGE`.

use admin_framework::{Cell, FieldValue, FormEvent, RemoteResource, UiConfig};
use rac_admin::lifecycle::{setup_tracing, RacConsole};
use rac_admin::model::{EndpointPayload, FlowDesignation, FlowPayload, Protocol, ProviderPayload};
use rac_admin::views::EndpointForm;
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = UiConfig::load("rac-admin.toml")?;
    let console = RacConsole::new(config);

    // Seed reference data
    let span = tracing::info_span!("seed");
    let provider = async {
        let authz = console
            .flows
            .create(FlowPayload::new(
                "default-provider-authorization-implicit-consent",
                "Authorize Application",
                FlowDesignation::Authorization,
            ))
            .await?;
        console
            .flows
            .create(FlowPayload::new(
                "default-authentication-flow",
                "Welcome",
                FlowDesignation::Authentication,
            ))
            .await?;

        let mut ids = Vec::new();
        for (name, protocol, host) in [
            ("build-server", Protocol::Ssh, "build.internal:22"),
            ("finance-desktop", Protocol::Rdp, "10.0.4.12"),
            ("lab-kiosk", Protocol::Vnc, "kiosk.lab:5900"),
        ] {
            let endpoint = console
                .endpoints
                .create(EndpointPayload::new(name, protocol, host))
                .await?;
            ids.push(endpoint.pk);
        }

        console
            .providers
            .create(
                ProviderPayload::new("Office access", authz.pk)
                    .with_endpoints(ids.into_iter().take(2)),
            )
            .await
    }
    .instrument(span)
    .await?;
    info!(provider = %provider.pk, endpoints = provider.endpoints.len(), "Seeded");

    // Endpoints list
    let mut list = console.endpoint_list(None);
    list.settle_all().await;
    for row in list.render().rows {
        if let Some(Cell::Text(name)) = row.cells.first() {
            info!(id = %row.id, name, "Row");
        }
    }

    // Create an endpoint from the list
    let mut form = list.create_form(Arc::new(EndpointForm));
    form.load().await?;
    form.set_value("name", FieldValue::text("support-jumphost"))?;
    form.set_value("protocol", FieldValue::choice("ssh"))?;
    form.set_value("host", FieldValue::text("jump.support:22"))?;
    form.set_value("settings", FieldValue::text("port: 22\n"))?;
    form.submit()?;
    if let Some(FormEvent::Saved { message, .. }) = form.settle().await {
        info!(success = %message, "Form closed");
    }
    form.close();
    list.settle_all().await;
    info!(total = list.render().total_count, "Endpoints after create");

    // Bulk delete the first two rows
    for row in list.render().rows.iter().take(2) {
        list.toggle_row(&row.id);
    }
    let review = list.bulk_delete()?.review().await;
    for candidate in review.candidates() {
        match &candidate.used_by {
            Ok(used) => {
                for entry in used {
                    warn!(
                        endpoint = %candidate.item.name,
                        used_by = %entry.resource_label,
                        "Deleting will update a dependent object"
                    );
                }
            }
            Err(failure) => {
                warn!(endpoint = %candidate.item.name, %failure, "Used-by lookup failed")
            }
        }
    }
    let report = review.confirm().await;
    info!(%report, "Bulk delete");
    list.apply_bulk_delete(&report);
    list.settle_all().await;

    // Replace the provider's endpoints with whatever is left
    let mut provider_form = console.provider_form(Some(provider.pk));
    provider_form.load().await?;
    let remaining: Vec<String> = list
        .render()
        .rows
        .iter()
        .map(|row| row.id.to_string())
        .collect();
    provider_form.set_value("endpoints", FieldValue::many(remaining))?;
    provider_form.submit()?;
    match provider_form.settle().await {
        Some(FormEvent::Saved { message, .. }) => info!(success = %message, "Provider saved"),
        Some(FormEvent::SubmitFailed(failure)) => warn!(%failure, "Provider not saved"),
        _ => {}
    }
    provider_form.close();

    drop(list);
    console.shutdown().await?;
    info!("Session completed successfully");
    Ok(())
}
