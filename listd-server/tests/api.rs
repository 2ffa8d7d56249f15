//! End-to-end tests against a real PostgreSQL database
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p listd-server -- --ignored
//!
//! Every test builds its own fixtures with unique names, so tests can run
//! in parallel against a shared database without truncating tables.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use listd_server::db::pool::create_pool;
use listd_server::db::repos::{DbError, ItemFilter, ItemRepo, ListRepo};
use listd_server::db::schema;
use listd_server::{build_router, AppState, ServerConfig};

struct TestApp {
    app: Router,
    pool: PgPool,
}

impl TestApp {
    async fn spawn() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("listd_server=debug")
            .with_test_writer()
            .try_init();

        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        schema::apply(&pool).await.expect("schema apply failed");

        let app = build_router(AppState::new(pool.clone()), &ServerConfig::default());
        Self { app, pool }
    }

    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Create a list with a unique name, returning its id.
    async fn seed_list(&self, prefix: &str) -> i64 {
        let (status, body) = self
            .call("POST", "/list", Some(json!({ "name": unique(prefix) })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["results"]["id"].as_i64().unwrap()
    }

    async fn seed_item(&self, list_id: i64, name: &str, quantity: i64) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                &format!("/list/{list_id}/item"),
                Some(json!({ "name": name, "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["results"]["id"].as_i64().unwrap()
    }
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

fn timestamp(value: &Value) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(value.as_str().expect("timestamp string")).expect("rfc3339")
}

#[tokio::test]
#[ignore = "requires database"]
async fn list_round_trip() {
    let t = TestApp::spawn().await;
    let name = unique("Round trip");

    let (status, created) = t.call("POST", "/list", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("errors").is_none());
    let id = created["results"]["id"].as_i64().unwrap();

    let (status, fetched) = t.call("GET", &format!("/list/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["results"]["name"], name.as_str());
    assert!(timestamp(&fetched["results"]["created"]).timestamp() > 0);
    assert!(timestamp(&fetched["results"]["modified"]).timestamp() > 0);

    let (status, all) = t.call("GET", "/list", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = all["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_list_name_is_rejected() {
    let t = TestApp::spawn().await;
    let name = unique("Duplicate");

    let (first, _) = t.call("POST", "/list", Some(json!({ "name": name }))).await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, body) = t.call("POST", "/list", Some(json!({ "name": name }))).await;
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert!(body["results"].is_null());
    assert!(body["errors"][0]["message"]
        .as_str()
        .unwrap()
        .contains("unique name constraint"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn rename_onto_existing_name_is_rejected() {
    let t = TestApp::spawn().await;
    let taken = unique("Taken");
    t.call("POST", "/list", Some(json!({ "name": taken }))).await;
    let other = t.seed_list("Other").await;

    let (status, _) = t
        .call("PUT", &format!("/list/{other}"), Some(json!({ "name": taken })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn rename_updates_name_and_modified() {
    let t = TestApp::spawn().await;
    let id = t.seed_list("Before").await;
    let renamed = unique("After");

    let (status, body) = t
        .call("PUT", &format!("/list/{id}"), Some(json!({ "name": renamed })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["id"].as_i64(), Some(id));
    assert_eq!(body["results"]["name"], renamed.as_str());
    assert!(timestamp(&body["results"]["modified"]) >= timestamp(&body["results"]["created"]));

    let (status, _) = t
        .call("PUT", "/list/0", Some(json!({ "name": unique("Ghost") })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_list_cascades_to_items() {
    let t = TestApp::spawn().await;
    let list_id = t.seed_list("Cascade").await;
    let first = t.seed_item(list_id, "Eggs", 12).await;
    let second = t.seed_item(list_id, "Bread", 1).await;

    let (status, body) = t.call("DELETE", &format!("/list/{list_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    for item_id in [first, second] {
        let (status, _) = t
            .call("GET", &format!("/list/{list_id}/item/{item_id}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let orphans: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM item WHERE list_id = $1")
        .bind(list_id as i32)
        .fetch_one(&t.pool)
        .await
        .unwrap();
    assert_eq!(orphans.0, 0);

    let (status, _) = t.call("DELETE", &format!("/list/{list_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_quantity_must_be_positive() {
    let t = TestApp::spawn().await;
    let list_id = t.seed_list("Quantities").await;
    let uri = format!("/list/{list_id}/item");

    for bad in [0, -1] {
        let (status, _) = t
            .call("POST", &uri, Some(json!({ "name": "Milk", "quantity": bad })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "quantity {bad}");
    }

    for good in [1, 2] {
        let (status, body) = t
            .call("POST", &uri, Some(json!({ "name": "Milk", "quantity": good })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "quantity {good}");
        assert_eq!(body["results"]["quantity"], good);
        assert_eq!(body["results"]["listID"].as_i64(), Some(list_id));
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_collection_empty_vs_missing_list() {
    let t = TestApp::spawn().await;
    let list_id = t.seed_list("Empty").await;

    let (status, body) = t.call("GET", &format!("/list/{list_id}/item"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([]));

    // SERIAL ids start at 1, so 0 never exists
    let (status, body) = t.call("GET", "/list/0/item", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errors"][0]["message"], "Not Found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn creating_item_in_missing_list_is_404() {
    let t = TestApp::spawn().await;

    let (status, _) = t
        .call("POST", "/list/0/item", Some(json!({ "name": "Milk", "quantity": 1 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn item_update_and_delete_are_scoped_to_list() {
    let t = TestApp::spawn().await;
    let list_id = t.seed_list("Owner").await;
    let other_list = t.seed_list("Stranger").await;
    let item_id = t.seed_item(list_id, "Apples", 3).await;

    let (status, body) = t
        .call(
            "PUT",
            &format!("/list/{list_id}/item/{item_id}"),
            Some(json!({ "name": "Green apples", "quantity": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["name"], "Green apples");
    assert_eq!(body["results"]["quantity"], 5);

    // Same item id through another list is invisible
    let (status, _) = t
        .call("GET", &format!("/list/{other_list}/item/{item_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .call(
            "PUT",
            &format!("/list/{other_list}/item/{item_id}"),
            Some(json!({ "name": "Stolen", "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .call("DELETE", &format!("/list/{other_list}/item/{item_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = t
        .call("DELETE", &format!("/list/{list_id}/item/{item_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .call("DELETE", &format!("/list/{list_id}/item/{item_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn grocery_scenario() {
    let t = TestApp::spawn().await;
    let name = unique("Grocery");

    let (status, list) = t.call("POST", "/list", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(list["results"]["name"], name.as_str());
    let id = list["results"]["id"].as_i64().unwrap();

    let (status, _) = t
        .call(
            "POST",
            &format!("/list/{id}/item"),
            Some(json!({ "name": "Milk", "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, items) = t.call("GET", &format!("/list/{id}/item"), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = items["results"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Milk");
    assert_eq!(items[0]["quantity"], 2);

    let (status, _) = t.call("DELETE", &format!("/list/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t.call("GET", &format!("/list/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn probes_report_ok() {
    let t = TestApp::spawn().await;

    for path in ["/ready", "/healthy"] {
        let (status, body) = t.call("GET", path, None).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["results"]["status"], "ok");
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn repositories_return_typed_outcomes() {
    let t = TestApp::spawn().await;
    let lists = ListRepo::new(&t.pool);
    let items = ItemRepo::new(&t.pool);

    assert!(matches!(lists.get(0).await, Err(DbError::NotFound { resource: "list", .. })));
    assert!(matches!(lists.delete(0).await, Err(DbError::NotFound { .. })));
    assert!(matches!(items.list_for_list(0).await, Err(DbError::NotFound { .. })));

    let list_id = t.seed_list("Typed").await as i32;
    assert!(items.select(ItemFilter::ByList(list_id)).await.unwrap().is_empty());
    assert!(items
        .select_one(ItemFilter::ByIdAndList { item_id: 0, list_id })
        .await
        .unwrap()
        .is_none());

    let existing = lists.get(list_id).await.unwrap();
    let dup = listd_server::models::ListName::new(&existing.name).unwrap();
    assert!(matches!(lists.create(dup).await, Err(DbError::Conflict { .. })));
}
