use crate::model::{Endpoint, EndpointId, Flow, ProviderId, RacProvider};
use crate::views::{mount_endpoint_list, EndpointForm, EndpointList, ProviderForm};
use crate::{endpoint_actor, flow_actor, provider_actor};
use admin_framework::{FormController, ResourceClient, UiConfig};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Service task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

pub type EndpointFormController = FormController<EndpointForm, ResourceClient<Endpoint>>;
pub type ProviderFormController = FormController<
    ProviderForm<ResourceClient<Flow>, ResourceClient<Endpoint>>,
    ResourceClient<RacProvider>,
>;

/// The running console: its configuration, one client per resource service,
/// and the service tasks.
///
/// # Example
///
/// ```ignore
/// let console = RacConsole::new(UiConfig::default());
///
/// let mut endpoints = console.endpoint_list(None);
/// endpoints.settle_all().await;
///
/// drop(endpoints);
/// console.shutdown().await?;
/// ```
pub struct RacConsole {
    pub config: UiConfig,
    pub flows: ResourceClient<Flow>,
    pub providers: ResourceClient<RacProvider>,
    pub endpoints: ResourceClient<Endpoint>,
    /// Service tasks in shutdown order.
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl RacConsole {
    /// Starts every resource service with its dependencies injected.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: UiConfig) -> Self {
        // 1. Create services (no dependencies yet)
        let (flow_actor, flows) = flow_actor::new();
        let (provider_actor, providers) = provider_actor::new();
        let (endpoint_actor, endpoints) = endpoint_actor::new();

        // 2. Start them with injected context
        let flow_handle = tokio::spawn(flow_actor.run(()));
        let provider_handle = tokio::spawn(provider_actor.run(flows.clone()));
        let endpoint_handle = tokio::spawn(endpoint_actor.run(providers.clone()));

        info!(per_page = config.pagination.per_page, "Console started");
        Self {
            config,
            flows,
            providers,
            endpoints,
            handles: vec![
                ("endpoints", endpoint_handle),
                ("providers", provider_handle),
                ("flows", flow_handle),
            ],
        }
    }

    /// Mounts the Endpoints page; its first fetch is already in flight.
    pub fn endpoint_list(&self, search: Option<&str>) -> EndpointList<ResourceClient<Endpoint>> {
        mount_endpoint_list(self.endpoints.clone(), &self.config, search)
    }

    /// Endpoint form; `None` creates.
    pub fn endpoint_form(&self, id: Option<EndpointId>) -> EndpointFormController {
        FormController::new(Arc::new(EndpointForm), self.endpoints.clone(), id)
    }

    /// RAC provider form; `None` creates.
    pub fn provider_form(&self, id: Option<ProviderId>) -> ProviderFormController {
        let schema = ProviderForm::new(self.flows.clone(), self.endpoints.clone());
        FormController::new(Arc::new(schema), self.providers.clone(), id)
    }

    /// Stops every service and waits for it to finish.
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console...");

        // Closing the channels ends each service loop.
        drop(self.endpoints);
        drop(self.providers);
        drop(self.flows);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(service = name, error = %e, "Service task failed");
                return Err(e.into());
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}
