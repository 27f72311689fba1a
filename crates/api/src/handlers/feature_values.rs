//! Handlers acting on a single feature value: delete, duplicate, relocate.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use featmgr_core::types::DbId;
use featmgr_db::models::feature::{DuplicateFeatureValueRequest, RelocateFeatureValueRequest};
use serde_json::json;

use crate::error::{AppResult, OperationContext};
use crate::response::ActionResponse;
use crate::services::feature_values;
use crate::state::AppState;

/// DELETE /api/v1/feature-values/{id_feature_value}
pub async fn delete_feature_value(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature_value) = path?;
    feature_values::delete_feature_value(&state.catalog, id_feature_value)
        .await
        .during(
            "delete feature value",
            json!({ "id_feature_value": id_feature_value }),
        )?;

    tracing::info!(id_feature_value, "Feature value deleted");

    Ok(Json(ActionResponse::ok(
        "Feature value deleted",
        json!({ "id_feature_value": id_feature_value }),
    )))
}

/// POST /api/v1/feature-values/{id_feature_value}/duplicate
///
/// Copies the value under `id_feature`; the original is untouched.
pub async fn duplicate_feature_value(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<DuplicateFeatureValueRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature_value) = path?;
    let Json(input) = payload?;
    let id_lang = state.config.lang_or_default(input.id_lang);

    let copy = feature_values::duplicate_feature_value(
        &state.catalog,
        id_feature_value,
        input.id_feature,
        id_lang,
    )
    .await
    .during(
        "duplicate feature value",
        json!({ "id_feature": input.id_feature, "id_feature_value": id_feature_value }),
    )?;

    tracing::info!(
        old_id_feature_value = id_feature_value,
        id_feature_value = copy.id_feature_value,
        id_feature = copy.id_feature,
        "Feature value duplicated",
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok(
            "Feature value duplicated",
            json!({
                "id_feature": copy.id_feature,
                "value": copy.value,
                "id_feature_value": copy.id_feature_value,
                "old_id_feature_value": id_feature_value,
                "feature_value": copy,
            }),
        )),
    ))
}

/// POST /api/v1/feature-values/{id_feature_value}/relocate
///
/// Moves the value from `id_feature` to `new_id_feature` together with all
/// of its product associations.
pub async fn relocate_feature_value(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<RelocateFeatureValueRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature_value) = path?;
    let Json(input) = payload?;
    let id_lang = state.config.lang_or_default(input.id_lang);

    let relocated = feature_values::relocate_feature_value(
        &state.catalog,
        id_feature_value,
        input.id_feature,
        input.new_id_feature,
        id_lang,
    )
    .await
    .during(
        "relocate feature value",
        json!({
            "id_feature": input.id_feature,
            "new_id_feature": input.new_id_feature,
            "id_feature_value": id_feature_value,
        }),
    )?;

    tracing::info!(
        id_feature_value,
        old_id_feature = input.id_feature,
        new_id_feature = input.new_id_feature,
        products = relocated.id_products.len(),
        "Feature value relocated",
    );

    Ok(Json(ActionResponse::ok(
        "Feature value relocated",
        json!({
            "id_feature": relocated.feature_value.id_feature,
            "value": relocated.feature_value.value,
            "id_feature_value": relocated.feature_value.id_feature_value,
            "old_id_feature": relocated.old_id_feature,
            "id_products": relocated.id_products,
        }),
    )))
}
