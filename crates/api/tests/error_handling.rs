//! Tests for `AppError` → HTTP response mapping.
//!
//! Most call `IntoResponse` directly on `AppError` values; body rejections
//! go through the router.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use featmgr_api::error::{AppError, OperationContext};
use featmgr_core::error::CoreError;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, build_test_app, delete, get, seeded_catalog};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Feature",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Feature not found");
}

// ---------------------------------------------------------------------------
// Test: invalid product IDs map to 400 with VALIDATION_ERROR code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_product_id_returns_400() {
    let err = AppError::Core(CoreError::InvalidProductId(-3));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(
        json["message"],
        "Product id -3 is invalid. Product id must be a number greater than zero"
    );
}

// ---------------------------------------------------------------------------
// Test: CoreError::Conflict maps to 409 and keeps echoed parameters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_with_context_echoes_parameters() {
    let result: Result<(), CoreError> = Err(CoreError::Conflict("Feature ID incorrect".into()));
    let err = result
        .during(
            "relocate feature value",
            json!({ "id_feature": 7, "id_feature_value": 12 }),
        )
        .unwrap_err();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["message"], "Feature ID incorrect");
    assert_eq!(json["id_feature"], 7);
    assert_eq!(json["id_feature_value"], 12);
}

// ---------------------------------------------------------------------------
// Test: echoed parameters never override the envelope keys
// ---------------------------------------------------------------------------

#[tokio::test]
async fn echo_cannot_override_envelope() {
    let result: Result<(), CoreError> = Err(CoreError::Validation("bad".into()));
    let err = result
        .during("create feature", json!({ "success": true, "message": "spoof" }))
        .unwrap_err();

    let (_, json) = error_to_response(err).await;

    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "bad");
}

// ---------------------------------------------------------------------------
// Test: store failures map to 500 and sanitize the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn persistence_error_returns_500_and_sanitizes_message() {
    let result: Result<(), CoreError> = Err(CoreError::Persistence(
        "delete_feature: connection reset by 10.0.0.3".into(),
    ));
    let err = result
        .during("delete feature", json!({ "id_feature": 5 }))
        .unwrap_err();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "Error occurred when trying to delete feature");
    assert_eq!(json["id_feature"], 5);
}

// ---------------------------------------------------------------------------
// Test: malformed JSON bodies are rendered as BAD_REQUEST envelopes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_json_body_returns_400_envelope() {
    let app = build_test_app(seeded_catalog());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/products/add")
        .header("content-type", "application/json")
        .body(Body::from("{\"new_id_feature\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["message"], "invalid field value");
}

// ---------------------------------------------------------------------------
// Test: non-numeric path and query IDs are rendered as BAD_REQUEST envelopes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_numeric_ids_in_path_or_query_return_400_envelope() {
    let responses = [
        get(build_test_app(seeded_catalog()), "/api/v1/products?id_feature=abc").await,
        delete(build_test_app(seeded_catalog()), "/api/v1/features/abc").await,
        get(build_test_app(seeded_catalog()), "/api/v1/features?id_lang=x").await,
        get(build_test_app(seeded_catalog()), "/api/v1/orphans/features?id_lang=x").await,
    ];

    for response in responses {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("application/json"), "got {content_type}");

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

// ---------------------------------------------------------------------------
// Test: `?` on a bare core result renders without operation context
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bare_core_error_converts_through_question_mark() {
    fn lookup() -> Result<(), AppError> {
        let missing: Result<(), CoreError> = Err(CoreError::NotFound {
            entity: "Feature value",
            id: 404,
        });
        missing?;
        Ok(())
    }

    let err = lookup().unwrap_err();
    assert!(matches!(err, AppError::Core(_)));

    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Feature value not found");
}
