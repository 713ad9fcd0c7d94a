mod common;

use admin_framework::{
    ClientError, ListQuery, Ordering, RemoteResource, ResourceActor, REQUIRED_MESSAGE,
};
use common::{Widget, WidgetPayload};

async fn seeded(names: &[&str]) -> admin_framework::ResourceClient<Widget> {
    let (actor, client) = ResourceActor::<Widget>::new(16);
    tokio::spawn(actor.run(()));
    for name in names {
        client.create(WidgetPayload::named(name)).await.unwrap();
    }
    client
}

#[tokio::test]
async fn test_loopback_full_lifecycle() {
    let (actor, client) = ResourceActor::<Widget>::new(10);
    let handle = tokio::spawn(actor.run(()));

    // 1. Create
    let created = client.create(WidgetPayload::named("Alpha")).await.unwrap();
    assert_eq!(created.id, 1); // First ID should be 1

    // 2. Retrieve
    let fetched = client.retrieve(1).await.unwrap();
    assert_eq!(fetched, created);

    // 3. Update replaces the whole state
    let mut payload = WidgetPayload::named("Beta");
    payload.tier = "gold".to_string();
    let updated = client.update(1, payload).await.unwrap();
    assert_eq!(updated.name, "Beta");
    assert_eq!(updated.tier, "gold");

    // 4. Delete
    client.delete(1).await.unwrap();
    assert_eq!(
        client.retrieve(1).await,
        Err(ClientError::NotFound("1".to_string()))
    );
    assert!(matches!(
        client.delete(1).await,
        Err(ClientError::NotFound(_))
    ));

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_rejected_create_does_not_consume_an_id() {
    let client = seeded(&[]).await;

    let err = client.create(WidgetPayload::named("  ")).await.unwrap_err();
    match err {
        ClientError::Rejected(errors) => {
            assert_eq!(errors.messages_for("name"), [REQUIRED_MESSAGE]);
        }
        other => panic!("expected a rejection, got {other:?}"),
    }

    let err = client.create(WidgetPayload::named("forbidden")).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));

    let created = client.create(WidgetPayload::named("ok")).await.unwrap();
    assert_eq!(created.id, 1);
}

#[tokio::test]
async fn test_rejected_update_leaves_item_untouched() {
    let client = seeded(&["Alpha"]).await;

    let err = client
        .update(1, WidgetPayload::named("forbidden"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(client.retrieve(1).await.unwrap().name, "Alpha");

    let err = client.update(9, WidgetPayload::named("x")).await.unwrap_err();
    assert_eq!(err, ClientError::NotFound("9".to_string()));
}

#[tokio::test]
async fn test_list_search_ordering_and_paging() {
    let client = seeded(&["delta", "Alpha", "charlie", "bravo", "echo"]).await;

    // Default ordering is by name, case-insensitive
    let page = client.list(ListQuery::new(2)).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "bravo"]);
    assert_eq!(page.total_count, 5);
    assert_eq!(page.page_count(), 3);
    assert!(page.has_next());
    assert!(!page.has_previous());

    let mut query = ListQuery::new(2).with_ordering(Ordering::parse("-name"));
    query.page = 3;
    let page = client.list(query).await.unwrap();
    let names: Vec<_> = page.items.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Alpha"]);
    assert_eq!(page.page_number, 3);
    assert!(!page.has_next());

    let page = client
        .list(ListQuery::new(20).with_search("HA"))
        .await
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "charlie"]);
}

#[tokio::test]
async fn test_list_filters_and_list_all() {
    let client = seeded(&["a", "b", "c"]).await;
    let mut gold = WidgetPayload::named("b");
    gold.tier = "gold".to_string();
    client.update(2, gold).await.unwrap();

    let page = client
        .list(ListQuery::new(20).with_filter("tier", "gold"))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, 2);

    // Unknown filter fields match nothing
    let page = client
        .list(ListQuery::new(20).with_filter("colour", "red"))
        .await
        .unwrap();
    assert!(page.items.is_empty());

    let all = client.list_all(ListQuery::new(1)).await.unwrap();
    let ids: Vec<_> = all.iter().map(|w| w.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}

#[tokio::test]
async fn test_used_by_runs_entity_hook() {
    let client = seeded(&["shared-one", "solo"]).await;

    let used = client.used_by(1).await.unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].resource_kind, "Gadget");
    assert!(client.used_by(2).await.unwrap().is_empty());
    assert!(matches!(
        client.used_by(3).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_dead_service_reports_unavailable() {
    let (actor, client) = ResourceActor::<Widget>::new(4);
    drop(actor);
    assert_eq!(client.retrieve(1).await, Err(ClientError::Unavailable));
}
