mod common;

use admin_framework::mock::MockClient;
use admin_framework::{
    AdminError, ClientError, FieldKind, FieldValue, FormController, FormEvent, FormPhase,
    RemoteResource, REQUIRED_MESSAGE,
};
use common::{endpoint, page_of, seeded_console};
use rac_admin::model::{
    Flow, FlowDesignation, FlowId, FlowPayload, Protocol, ProviderPayload, RacProvider,
};
use rac_admin::views::ProviderForm;
use std::collections::BTreeSet;
use std::sync::Arc;

#[tokio::test]
async fn test_edit_replaces_endpoint_set() {
    let (console, flow, ids) = seeded_console(&["a", "b", "c"]).await;
    let provider = console
        .providers
        .create(ProviderPayload::new("Office", flow).with_endpoints([ids[0], ids[2]]))
        .await
        .unwrap();

    let mut form = console.provider_form(Some(provider.pk));
    form.load().await.unwrap();

    let render = form.render();
    let endpoints = &render.fields[3];
    assert_eq!(endpoints.name, "endpoints");
    let selected: Vec<_> = endpoints
        .choices()
        .iter()
        .filter(|c| c.selected)
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(selected, ["a", "c"]);
    let flow_field = &render.fields[1];
    assert_eq!(flow_field.value, FieldValue::choice(flow.to_string()));
    assert_eq!(flow_field.choices().len(), 1);

    form.toggle_choice("endpoints", &ids[2].to_string()).unwrap();
    form.toggle_choice("endpoints", &ids[1].to_string()).unwrap();
    form.submit().unwrap();
    let Some(FormEvent::Saved { message, .. }) = form.settle().await else {
        panic!("provider should save");
    };
    assert_eq!(message, "Successfully updated provider.");

    let stored = console.providers.retrieve(provider.pk).await.unwrap();
    assert_eq!(stored.endpoints, BTreeSet::from([ids[0], ids[1]]));

    drop(form);
    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_server_rejects_non_authorization_flow() {
    let (console, _, ids) = seeded_console(&["a"]).await;
    let login = console
        .flows
        .create(FlowPayload::new(
            "default-authentication-flow",
            "Welcome",
            FlowDesignation::Authentication,
        ))
        .await
        .unwrap();

    let mut form = console.provider_form(None);
    form.load().await.unwrap();
    // The choice list only offers authorization flows
    assert!(form.render().fields[1]
        .choices()
        .iter()
        .all(|c| c.value != login.pk.to_string()));

    form.set_value("name", FieldValue::text("Office")).unwrap();
    form.set_value("authorization_flow", FieldValue::choice(login.pk.to_string()))
        .unwrap();
    form.set_value("endpoints", FieldValue::many([ids[0].to_string()]))
        .unwrap();
    form.set_value("protocol", FieldValue::choice("ssh")).unwrap();
    let entered = form.values().clone();
    form.submit().unwrap();

    let event = form.settle().await.unwrap();
    assert!(matches!(event, FormEvent::SubmitFailed(_)));
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.values(), &entered);
    let errors = form.render().field_errors;
    assert!(errors.messages_for("authorization_flow")[0].contains("not authorization"));

    drop(form);
    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_create_requires_name_flow_and_endpoints() {
    let mut flows = MockClient::<Flow>::new();
    let mut endpoints = MockClient::<rac_admin::model::Endpoint>::new();
    flows.expect_list().return_ok(page_of(vec![Flow {
        pk: FlowId(1),
        slug: "authz".to_string(),
        name: "Authorize".to_string(),
        designation: FlowDesignation::Authorization,
    }]));
    endpoints
        .expect_list()
        .return_ok(page_of(vec![endpoint(1, "a", Protocol::Rdp)]));
    let providers = MockClient::<RacProvider>::new();

    let schema = ProviderForm::new(flows.client(), endpoints.client());
    let mut form = FormController::new(Arc::new(schema), providers.client(), None);
    form.load().await.unwrap();
    assert_eq!(form.values().choice("protocol"), Some("rdp"));
    assert_eq!(form.values().text("settings"), "{}");

    let AdminError::Validation(errors) = form.submit().unwrap_err() else {
        panic!("expected a validation error");
    };
    for field in ["name", "authorization_flow", "endpoints"] {
        assert_eq!(errors.messages_for(field), [REQUIRED_MESSAGE], "{field}");
    }
    assert_eq!(providers.request_count(), 0);
    flows.verify();
    endpoints.verify();
}

#[tokio::test]
async fn test_flow_load_failure_degrades_only_flow_field() {
    let mut flows = MockClient::<Flow>::new();
    let mut endpoints = MockClient::<rac_admin::model::Endpoint>::new();
    flows
        .expect_list()
        .return_err(ClientError::Remote("403 Forbidden".to_string()));
    endpoints.expect_list().return_ok(page_of(vec![
        endpoint(1, "a", Protocol::Rdp),
        endpoint(2, "b", Protocol::Vnc),
    ]));
    let providers = MockClient::<RacProvider>::new();

    let schema = ProviderForm::new(flows.client(), endpoints.client());
    let mut form = FormController::new(Arc::new(schema), providers.client(), None);
    form.begin_load().unwrap();
    let Some(FormEvent::Loaded { degraded }) = form.settle().await else {
        panic!("form should still load");
    };
    assert_eq!(degraded.len(), 1);
    assert_eq!(form.phase(), FormPhase::Ready);

    let render = form.render();
    match &render.fields[1].kind {
        FieldKind::Select { choices, degraded } => {
            assert!(choices.is_empty());
            assert!(degraded.is_some());
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(render.fields[3].choices().len(), 2);
}

#[tokio::test]
async fn test_endpoint_ids_survive_form_round_trip() {
    let (console, flow, ids) = seeded_console(&["a", "b"]).await;
    let mut form = console.provider_form(None);
    form.load().await.unwrap();
    form.set_value("name", FieldValue::text("Lab")).unwrap();
    form.set_value("authorization_flow", FieldValue::choice(flow.to_string()))
        .unwrap();
    form.toggle_choice("endpoints", &ids[1].to_string()).unwrap();
    form.set_value("settings", FieldValue::text("enable-drive: 'true'\n"))
        .unwrap();
    form.submit().unwrap();

    let Some(FormEvent::Saved { id, message }) = form.settle().await else {
        panic!("provider should save");
    };
    assert_eq!(message, "Successfully created provider.");
    let stored = console.providers.retrieve(id).await.unwrap();
    assert_eq!(stored.endpoints, BTreeSet::from([ids[1]]));
    assert_eq!(stored.protocol, Protocol::Rdp);
    assert_eq!(stored.settings["enable-drive"], "true");

    drop(form);
    console.shutdown().await.unwrap();
}
