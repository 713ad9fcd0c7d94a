//! The Endpoints list page.

use crate::model::Endpoint;
use admin_framework::{Cell, Column, ListController, ListView, RemoteResource, RowAction, UiConfig};

/// Object permission model for endpoint rows.
pub const ENDPOINT_PERMISSION_MODEL: &str = "providers_rac.endpoint";

pub struct EndpointListPage;

impl ListView for EndpointListPage {
    type Item = Endpoint;

    fn title(&self) -> &str {
        "Endpoints"
    }

    fn description(&self) -> &str {
        "Create and manage endpoints to remotely connect to via RDP/SSH/VNC."
    }

    fn icon(&self) -> &str {
        "fa fa-desktop"
    }

    fn columns(&self) -> Vec<Column> {
        vec![Column::sortable("Name", "name"), Column::new("Actions")]
    }

    fn row(&self, item: &Endpoint) -> Vec<Cell> {
        vec![
            Cell::Text(item.name.clone()),
            Cell::Actions(vec![
                RowAction::Edit,
                RowAction::Permissions {
                    model: ENDPOINT_PERMISSION_MODEL.to_string(),
                },
            ]),
        ]
    }
}

pub type EndpointList<C> = ListController<EndpointListPage, C>;

/// Mounts the Endpoints page and issues its first fetch.
pub fn mount_endpoint_list<C: RemoteResource<Endpoint>>(
    client: C,
    config: &UiConfig,
    search: Option<&str>,
) -> EndpointList<C> {
    let mut list = ListController::new(EndpointListPage, client, config);
    if let Some(search) = search {
        list = list.with_search(search);
    }
    list.refresh();
    list
}
