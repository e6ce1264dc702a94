//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use order_store::{
    ItemId, NewItem, NewOrder, OrderId, OrderStore, OrderStoreExt, PostgresOrderStore,
    StoreError,
};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresOrderStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE items, orders RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

fn widget_order(customer: &str) -> NewOrder {
    NewOrder::new(
        customer,
        vec![
            NewItem::new("X", "widget", 3),
            NewItem::new("Y", "gadget", 1),
        ],
    )
}

#[tokio::test]
#[serial]
async fn create_and_get_order() {
    let store = get_test_store().await;

    let created = store.create(widget_order("Alice")).await.unwrap();

    assert!(created.order_id.as_i64() > 0);
    assert_eq!(created.items.len(), 2);
    assert!(created.items.iter().all(|i| i.item_id.as_i64() > 0));
    assert!(created.items.iter().all(|i| i.order_id == created.order_id));
    assert_ne!(created.items[0].item_id, created.items[1].item_id);

    let loaded = store.get(created.order_id).await.unwrap();
    assert_eq!(loaded, created);
}

#[tokio::test]
#[serial]
async fn items_keep_input_order() {
    let store = get_test_store().await;

    let created = store.create(widget_order("Alice")).await.unwrap();
    let loaded = store.get(created.order_id).await.unwrap();

    let codes: Vec<_> = loaded.items.iter().map(|i| i.item_code.as_str()).collect();
    assert_eq!(codes, vec!["X", "Y"]);
}

#[tokio::test]
#[serial]
async fn item_ids_are_unique_across_orders() {
    let store = get_test_store().await;

    let alice = store.create(widget_order("Alice")).await.unwrap();
    let bob = store.create(widget_order("Bob")).await.unwrap();

    for item in &bob.items {
        assert!(alice.item(item.item_id).is_none());
    }
}

#[tokio::test]
#[serial]
async fn get_missing_order_is_not_found() {
    let store = get_test_store().await;

    let result = store.get(OrderId::new(404)).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn list_all_loads_items_eagerly() {
    let store = get_test_store().await;
    store.create(widget_order("Alice")).await.unwrap();
    store
        .create(NewOrder::new("Bob", vec![NewItem::new("Z", "gizmo", 7)]))
        .await
        .unwrap();
    store.create(NewOrder::new("Carol", vec![])).await.unwrap();

    let orders = store.list_all().await.unwrap();

    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].customer_name, "Alice");
    assert_eq!(orders[0].items.len(), 2);
    assert_eq!(orders[1].items[0].item_code, "Z");
    assert!(orders[2].items.is_empty());

    let again = store.list_all().await.unwrap();
    assert_eq!(orders, again);
}

#[tokio::test]
#[serial]
async fn save_overwrites_matched_items() {
    let store = get_test_store().await;
    let mut order = store.create(widget_order("Alice")).await.unwrap();

    order.customer_name = "Alicia".to_string();
    order.items[0].item_code = "B".to_string();
    order.items[0].quantity = 5;
    let saved = store.save(&order).await.unwrap();

    assert_eq!(saved.customer_name, "Alicia");
    assert_eq!(saved.items[0].item_code, "B");
    assert_eq!(saved.items[0].quantity, 5);
    assert_eq!(saved.items[0].item_id, order.items[0].item_id);
    assert_eq!(saved.items[1], order.items[1]);
    assert_eq!(saved.ordered_at, order.ordered_at);
}

#[tokio::test]
#[serial]
async fn save_with_foreign_item_rolls_back() {
    let store = get_test_store().await;
    let mut alice = store.create(widget_order("Alice")).await.unwrap();
    let bob = store.create(widget_order("Bob")).await.unwrap();

    alice.customer_name = "Mallory".to_string();
    alice.items.push(bob.items[0].clone());
    let result = store.save(&alice).await;

    assert!(matches!(result, Err(StoreError::ConstraintViolation(_))));
    assert_eq!(store.get(alice.order_id).await.unwrap().customer_name, "Alice");
    assert_eq!(store.get(bob.order_id).await.unwrap(), bob);
}

#[tokio::test]
#[serial]
async fn save_deleted_order_is_not_found() {
    let store = get_test_store().await;
    let order = store.create(widget_order("Alice")).await.unwrap();
    store.delete(order.order_id).await.unwrap();

    let result = store.save(&order).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn delete_cascades_to_items() {
    let store = get_test_store().await;
    let order = store.create(widget_order("Alice")).await.unwrap();

    store.delete(order.order_id).await.unwrap();

    assert!(!store.exists(order.order_id).await.unwrap());
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
#[serial]
async fn delete_missing_order_is_not_found() {
    let store = get_test_store().await;

    let result = store.delete(OrderId::new(1)).await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
#[serial]
async fn concurrent_creates_get_distinct_ids() {
    let store = get_test_store().await;

    let creates = (0..10).map(|n| {
        let store = store.clone();
        async move { store.create(widget_order(&format!("customer-{n}"))).await }
    });
    let orders = futures_util::future::try_join_all(creates).await.unwrap();

    let mut order_ids: Vec<OrderId> = orders.iter().map(|o| o.order_id).collect();
    order_ids.sort();
    order_ids.dedup();
    assert_eq!(order_ids.len(), 10);

    let mut item_ids: Vec<ItemId> = orders
        .iter()
        .flat_map(|o| o.items.iter().map(|i| i.item_id))
        .collect();
    item_ids.sort();
    item_ids.dedup();
    assert_eq!(item_ids.len(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn get_sees_header_and_items_from_one_commit() {
    let store = get_test_store().await;
    let mut order = store
        .create(NewOrder::new(
            "v0",
            vec![NewItem::new("v0", "a", 1), NewItem::new("v0", "b", 1)],
        ))
        .await
        .unwrap();
    let order_id = order.order_id;

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for version in 1..=50 {
                let tag = format!("v{version}");
                order.customer_name = tag.clone();
                for item in &mut order.items {
                    item.item_code = tag.clone();
                }
                store.save(&order).await.unwrap();
            }
        })
    };

    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..50 {
                let loaded = store.get(order_id).await.unwrap();
                assert_eq!(loaded.items.len(), 2);
                for item in &loaded.items {
                    assert_eq!(item.item_code, loaded.customer_name);
                }
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();

    let last = store.get(order_id).await.unwrap();
    assert_eq!(last.customer_name, "v50");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn get_racing_delete_never_returns_a_hollow_order() {
    let store = get_test_store().await;
    let mut order_ids = Vec::new();
    for n in 0..20 {
        order_ids.push(store.create(widget_order(&format!("c{n}"))).await.unwrap().order_id);
    }

    let deleter = {
        let store = store.clone();
        let order_ids = order_ids.clone();
        tokio::spawn(async move {
            for order_id in order_ids {
                store.delete(order_id).await.unwrap();
            }
        })
    };

    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for order_id in order_ids {
                match store.get(order_id).await {
                    Ok(loaded) => assert_eq!(loaded.items.len(), 2),
                    Err(StoreError::NotFound(id)) => assert_eq!(id, order_id),
                    Err(err) => panic!("unexpected error: {err}"),
                }
            }
        })
    };

    deleter.await.unwrap();
    reader.await.unwrap();
}
