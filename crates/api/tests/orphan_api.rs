//! HTTP-level integration tests for the `/orphans` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, ids, post_json, seeded_catalog};
use featmgr_core::feature::EntityKind;
use serde_json::json;

#[tokio::test]
async fn list_orphan_features_and_values() {
    let store = seeded_catalog();

    let features = body_json(get(build_test_app(store.clone()), "/api/v1/orphans/features").await).await;
    assert_eq!(features["message"], "Orphan Features retrieved");
    assert_eq!(ids(&features, "features", "id_feature"), vec![7, 9]);
    assert_eq!(features["features"][0]["name"], "Colour");

    let values = body_json(get(build_test_app(store), "/api/v1/orphans/feature-values").await).await;
    assert_eq!(values["message"], "Orphan Feature Values retrieved");
    assert_eq!(ids(&values, "feature_values", "id_feature_value"), vec![20, 30]);
}

#[tokio::test]
async fn associating_a_product_clears_orphan_status() {
    let store = seeded_catalog();

    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/products/add",
        json!({ "new_id_feature": 7, "new_id_feature_value": 20, "id_products": "104" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let features = body_json(get(build_test_app(store), "/api/v1/orphans/features").await).await;
    assert_eq!(ids(&features, "features", "id_feature"), vec![9]);
}

#[tokio::test]
async fn bulk_delete_orphan_features_with_mixed_ids() {
    let store = seeded_catalog();
    store.refuse_delete(EntityKind::Feature, 9);

    let response = post_json(
        build_test_app(store.clone()),
        "/api/v1/orphans/features/bulk-delete",
        json!({ "feature_ids": "7,abc,0,-2,404,9" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["feature_ids"], json!([7, 404, 9]));
    assert_eq!(json["deleted"], json!([7]));
    assert_eq!(json["skipped"], json!([404]));
    assert_eq!(json["failed"], json!([9]));
    assert_eq!(json["outcomes"][2]["status"], "failed");

    let left = body_json(get(build_test_app(store), "/api/v1/orphans/features").await).await;
    assert_eq!(ids(&left, "features", "id_feature"), vec![9]);
}

#[tokio::test]
async fn bulk_delete_orphan_values_succeeds() {
    let store = seeded_catalog();

    let json = body_json(
        post_json(
            build_test_app(store.clone()),
            "/api/v1/orphans/feature-values/bulk-delete",
            json!({ "feature_value_ids": [20, 30] }),
        )
        .await,
    )
    .await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Orphan Feature Values deleted");
    assert_eq!(json["deleted"], json!([20, 30]));

    let values = body_json(get(build_test_app(store), "/api/v1/orphans/feature-values").await).await;
    assert!(values["feature_values"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bulk_delete_with_no_valid_ids_is_a_successful_noop() {
    let app = build_test_app(seeded_catalog());

    let json = body_json(
        post_json(
            app,
            "/api/v1/orphans/features/bulk-delete",
            json!({ "feature_ids": "x,-1,0" }),
        )
        .await,
    )
    .await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "No features to delete");
    assert_eq!(json["deleted"], json!([]));
}
