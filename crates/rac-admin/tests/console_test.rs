mod common;

use admin_framework::{ClientError, ListQuery, RemoteResource, UiConfig, UsedByAction};
use common::seeded_console;
use rac_admin::lifecycle::RacConsole;
use rac_admin::model::{
    EndpointId, EndpointPayload, FlowDesignation, FlowId, FlowPayload, Protocol, ProviderPayload,
};
use std::collections::BTreeSet;

#[tokio::test]
async fn test_console_starts_and_shuts_down() {
    let console = RacConsole::new(UiConfig::default());
    let created = console
        .endpoints
        .create(EndpointPayload::new("kiosk", Protocol::Vnc, "kiosk:5900"))
        .await
        .unwrap();
    assert_eq!(created.pk, EndpointId(1));

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_endpoint_used_by_lists_referencing_providers() {
    let (console, flow, endpoints) = seeded_console(&["a", "b", "c"]).await;
    console
        .providers
        .create(ProviderPayload::new("Office", flow).with_endpoints([endpoints[0], endpoints[1]]))
        .await
        .unwrap();
    console
        .providers
        .create(ProviderPayload::new("Lab", flow).with_endpoints([endpoints[0]]))
        .await
        .unwrap();

    let used = console.endpoints.used_by(endpoints[0]).await.unwrap();
    let labels: Vec<_> = used.iter().map(|e| e.resource_label.as_str()).collect();
    assert_eq!(labels, ["Lab", "Office"]);
    assert!(used.iter().all(|e| e.action == UsedByAction::CascadeMany));
    assert!(used.iter().all(|e| e.resource_kind == "RAC Provider"));

    assert_eq!(console.endpoints.used_by(endpoints[1]).await.unwrap().len(), 1);
    assert!(console.endpoints.used_by(endpoints[2]).await.unwrap().is_empty());

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deleting_endpoint_removes_it_from_providers() {
    let (console, flow, endpoints) = seeded_console(&["a", "b"]).await;
    let office = console
        .providers
        .create(ProviderPayload::new("Office", flow).with_endpoints([endpoints[0], endpoints[1]]))
        .await
        .unwrap();
    let lab = console
        .providers
        .create(ProviderPayload::new("Lab", flow).with_endpoints([endpoints[0]]))
        .await
        .unwrap();

    console.endpoints.delete(endpoints[0]).await.unwrap();

    let office = console.providers.retrieve(office.pk).await.unwrap();
    assert_eq!(office.endpoints, BTreeSet::from([endpoints[1]]));
    assert_eq!(office.name, "Office");
    let lab = console.providers.retrieve(lab.pk).await.unwrap();
    assert!(lab.endpoints.is_empty());
    assert!(matches!(
        console.endpoints.retrieve(endpoints[0]).await,
        Err(ClientError::NotFound(_))
    ));
    assert_eq!(console.endpoints.used_by(endpoints[1]).await.unwrap().len(), 1);

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_provider_requires_an_authorization_flow() {
    let (console, _flow, _) = seeded_console(&[]).await;
    let login = console
        .flows
        .create(FlowPayload::new(
            "default-authentication-flow",
            "Welcome",
            FlowDesignation::Authentication,
        ))
        .await
        .unwrap();

    let err = console
        .providers
        .create(ProviderPayload::new("Office", login.pk))
        .await
        .unwrap_err();
    let ClientError::Rejected(errors) = err else {
        panic!("expected a rejection");
    };
    assert!(errors.messages_for("authorization_flow")[0].contains("not authorization"));

    let err = console
        .providers
        .create(ProviderPayload::new("Office", FlowId(99)))
        .await
        .unwrap_err();
    let ClientError::Rejected(errors) = err else {
        panic!("expected a rejection");
    };
    assert_eq!(
        errors.messages_for("authorization_flow"),
        ["Invalid pk \"99\" - object does not exist."]
    );

    let mut unnamed = ProviderPayload::new("  ", FlowId(1));
    unnamed.authorization_flow = None;
    let err = console.providers.create(unnamed).await.unwrap_err();
    let ClientError::Rejected(errors) = err else {
        panic!("expected a rejection");
    };
    assert_eq!(errors.fields.len(), 2);

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_endpoint_search_covers_protocol() {
    let (console, _, _) = seeded_console(&["alpha"]).await;
    console
        .endpoints
        .create(EndpointPayload::new("beta", Protocol::Ssh, "beta:22"))
        .await
        .unwrap();

    let mut list = console.endpoint_list(Some("ssh"));
    list.settle_all().await;
    let table = list.render();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.search.as_deref(), Some("ssh"));

    drop(list);
    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_endpoints_with_equal_names_order_by_protocol() {
    let (console, _, _) = seeded_console(&[]).await;
    let ssh = console
        .endpoints
        .create(EndpointPayload::new("gateway", Protocol::Ssh, "gw:22"))
        .await
        .unwrap();
    let rdp = console
        .endpoints
        .create(EndpointPayload::new("gateway", Protocol::Rdp, "gw:3389"))
        .await
        .unwrap();
    let vnc = console
        .endpoints
        .create(EndpointPayload::new("gateway", Protocol::Vnc, "gw:5900"))
        .await
        .unwrap();

    let page = console.endpoints.list(ListQuery::new(10)).await.unwrap();
    let pks: Vec<_> = page.items.iter().map(|e| e.pk).collect();
    assert_eq!(pks, [rdp.pk, ssh.pk, vnc.pk]);

    console.shutdown().await.unwrap();
}
