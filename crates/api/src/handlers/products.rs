//! Handlers for product lookup and association moves.
//!
//! Product ID lists are filtered on the way in: non-numeric and non-positive
//! entries are dropped, repeats collapsed.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use featmgr_core::error::CoreResult;
use featmgr_core::feature::FeaturePair;
use featmgr_db::models::product::{
    ProductAddRequest, ProductDeleteRequest, ProductListParams, ProductRelocateRequest,
    TransferSummary,
};
use serde_json::json;

use crate::error::{AppResult, OperationContext};
use crate::response::ActionResponse;
use crate::services::products;
use crate::state::AppState;

/// GET /api/v1/products
///
/// Products carrying `id_feature`, optionally restricted to the values in
/// `id_feature_value` (single ID or comma-separated list).
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductListParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let id_lang = state.config.lang_or_default(params.id_lang);
    let id_shop = state.config.shop_or_default(params.id_shop);
    let value_ids = params.id_feature_value.into_vec();

    let rows = products::get_products(
        &state.catalog,
        params.id_feature,
        value_ids.clone(),
        id_lang,
        id_shop,
    )
    .await
    .during(
        "get products",
        json!({
            "id_feature": params.id_feature,
            "id_feature_value": value_ids,
            "id_lang": id_lang,
            "id_shop": id_shop,
        }),
    )?;

    Ok(Json(ActionResponse::ok(
        "Products retrieved",
        json!({
            "id_feature": params.id_feature,
            "id_feature_value": value_ids,
            "id_lang": id_lang,
            "id_shop": id_shop,
            "products": rows,
        }),
    )))
}

/// POST /api/v1/products/relocate
///
/// Moves products from (`id_feature`, `id_feature_value`) to
/// (`new_id_feature`, `new_id_feature_value`) atomically.
pub async fn relocate_products(
    State(state): State<AppState>,
    payload: Result<Json<ProductRelocateRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let echo = json!({
        "id_feature": input.id_feature,
        "id_feature_value": input.id_feature_value,
        "new_id_feature": input.new_id_feature,
        "new_id_feature_value": input.new_id_feature_value,
        "id_products": input.id_products,
    });

    let summary: CoreResult<TransferSummary> = async {
        let from = FeaturePair::new(input.id_feature, input.id_feature_value)?;
        let to = FeaturePair::new_target(input.new_id_feature, input.new_id_feature_value)?;
        products::relocate_products(&state.catalog, from, to, input.id_products.as_slice()).await
    }
    .await;
    let summary = summary.during("relocate products", echo.clone())?;

    tracing::info!(
        id_feature = input.id_feature,
        id_feature_value = input.id_feature_value,
        new_id_feature = input.new_id_feature,
        new_id_feature_value = input.new_id_feature_value,
        inserted = summary.inserted,
        deleted = summary.deleted,
        "Products relocated",
    );

    Ok(Json(ActionResponse::ok(
        "Products relocated",
        with_fields(echo, json!({ "inserted": summary.inserted, "deleted": summary.deleted })),
    )))
}

/// POST /api/v1/products/add
///
/// Associates products with (`new_id_feature`, `new_id_feature_value`).
pub async fn add_products(
    State(state): State<AppState>,
    payload: Result<Json<ProductAddRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let echo = json!({
        "new_id_feature": input.new_id_feature,
        "new_id_feature_value": input.new_id_feature_value,
        "id_products": input.id_products,
    });

    let inserted: CoreResult<u64> = async {
        let to = FeaturePair::new_target(input.new_id_feature, input.new_id_feature_value)?;
        products::add_products(&state.catalog, to, input.id_products.as_slice()).await
    }
    .await;
    let inserted = inserted.during("add products", echo.clone())?;

    tracing::info!(
        new_id_feature = input.new_id_feature,
        new_id_feature_value = input.new_id_feature_value,
        inserted,
        "Products added",
    );

    Ok(Json(ActionResponse::ok(
        "Products added to right-hand column",
        with_fields(echo, json!({ "inserted": inserted })),
    )))
}

/// POST /api/v1/products/delete
///
/// Removes the association of products with (`id_feature`, `id_feature_value`).
pub async fn delete_products(
    State(state): State<AppState>,
    payload: Result<Json<ProductDeleteRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let echo = json!({
        "id_feature": input.id_feature,
        "id_feature_value": input.id_feature_value,
        "id_products": input.id_products,
    });

    let deleted: CoreResult<u64> = async {
        let from = FeaturePair::new(input.id_feature, input.id_feature_value)?;
        products::delete_products(&state.catalog, from, input.id_products.as_slice()).await
    }
    .await;
    let deleted = deleted.during("delete products", echo.clone())?;

    tracing::info!(
        id_feature = input.id_feature,
        id_feature_value = input.id_feature_value,
        deleted,
        "Products deleted",
    );

    Ok(Json(ActionResponse::ok(
        "Products deleted",
        with_fields(echo, json!({ "deleted": deleted })),
    )))
}

/// Merge the keys of `extra` into the object `base`.
fn with_fields(mut base: serde_json::Value, extra: serde_json::Value) -> serde_json::Value {
    if let (Some(base_map), serde_json::Value::Object(extra_map)) = (base.as_object_mut(), extra)
    {
        base_map.extend(extra_map);
    }
    base
}
