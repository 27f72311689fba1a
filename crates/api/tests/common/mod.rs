#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use featmgr_api::config::ServerConfig;
use featmgr_api::router::build_app_router;
use featmgr_api::state::{AppState, Catalog};
use featmgr_db::stores::{InMemoryCatalog, ProductSeed};
use featmgr_db::tables::DEFAULT_TABLE_PREFIX;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// language 1 and shop 1.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 1,
        table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
        default_lang_id: 1,
        default_shop_id: 1,
        run_migrations: false,
    }
}

/// Build the full application router over `store`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the tests exercise
/// the production middleware stack.
pub fn build_test_app(store: Arc<InMemoryCatalog>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Catalog::in_memory(store),
    };
    build_app_router(state, &config)
}

/// Catalog used by most tests:
///
/// - feature 5 "Color" with values 12 "Red" and 13 "Blue";
/// - feature 7 "Colour" with value 20 "Teal";
/// - feature 9 "Unused" with value 30 "Nothing", no products;
/// - products 101..=104 in category 3 "Shirts" of shop 1;
/// - (5, 12) carries 101 and 102, (5, 13) carries 103.
pub fn seeded_catalog() -> Arc<InMemoryCatalog> {
    let store = Arc::new(InMemoryCatalog::new());
    store.insert_feature(5, &[(1, "Color")]);
    store.insert_feature(7, &[(1, "Colour")]);
    store.insert_feature(9, &[(1, "Unused")]);
    store.insert_feature_value(12, 5, &[(1, "Red")]);
    store.insert_feature_value(13, 5, &[(1, "Blue")]);
    store.insert_feature_value(20, 7, &[(1, "Teal")]);
    store.insert_feature_value(30, 9, &[(1, "Nothing")]);
    store.insert_category(3, 1, "Shirts");
    store.insert_manufacturer(4, "Loomworks");
    for id in 101..=104 {
        let mut product = ProductSeed::simple(id, 1, &format!("Shirt {id}"), 1, 3);
        product.id_manufacturer = 4;
        product.reference = Some(format!("REF-{id}"));
        store.insert_product(product);
    }
    store.associate(5, 12, &[101, 102]);
    store.associate(5, 13, &[103]);
    store
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// IDs under `key` in each element of `json[list]`.
pub fn ids(json: &serde_json::Value, list: &str, key: &str) -> Vec<i64> {
    json[list]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row[key].as_i64().unwrap())
        .collect()
}
