//! Handlers for features and the values listed under them.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use featmgr_core::types::DbId;
use featmgr_db::models::feature::{CreateFeatureRequest, CreateFeatureValueRequest, LangParams};
use serde_json::json;

use crate::error::{AppResult, OperationContext};
use crate::response::ActionResponse;
use crate::services::{feature_values, features};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// POST /api/v1/features
pub async fn create_feature(
    State(state): State<AppState>,
    payload: Result<Json<CreateFeatureRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let id_lang = state.config.lang_or_default(input.id_lang);

    let feature = features::create_feature(&state.catalog, &input.name, id_lang)
        .await
        .during("create feature", json!({ "name": input.name, "id_lang": id_lang }))?;

    tracing::info!(id_feature = feature.id_feature, id_lang, "Feature created");

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok(
            "Feature created",
            json!({ "id_feature": feature.id_feature, "feature": feature }),
        )),
    ))
}

/// GET /api/v1/features
///
/// Every feature in position order, localized in `id_lang`.
pub async fn list_features(
    State(state): State<AppState>,
    query: Result<Query<LangParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let id_lang = state.config.lang_or_default(params.id_lang);

    let features = features::list_features(&state.catalog, id_lang)
        .await
        .during("list features", json!({ "id_lang": id_lang }))?;

    Ok(Json(ActionResponse::ok(
        "Features retrieved",
        json!({ "id_lang": id_lang, "features": features }),
    )))
}

/// DELETE /api/v1/features/{id_feature}
///
/// Also removes the feature's values and every association row.
pub async fn delete_feature(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature) = path?;
    features::delete_feature(&state.catalog, id_feature)
        .await
        .during("delete feature", json!({ "id_feature": id_feature }))?;

    tracing::info!(id_feature, "Feature deleted");

    Ok(Json(ActionResponse::ok(
        "Feature deleted",
        json!({ "id_feature": id_feature }),
    )))
}

// ---------------------------------------------------------------------------
// Values of a feature
// ---------------------------------------------------------------------------

/// POST /api/v1/features/{id_feature}/values
pub async fn create_feature_value(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<CreateFeatureValueRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature) = path?;
    let Json(input) = payload?;
    let id_lang = state.config.lang_or_default(input.id_lang);

    let value = feature_values::create_feature_value(
        &state.catalog,
        id_feature,
        &input.value,
        input.custom,
        id_lang,
    )
    .await
    .during(
        "create feature value",
        json!({ "id_feature": id_feature, "value": input.value, "id_lang": id_lang }),
    )?;

    tracing::info!(
        id_feature,
        id_feature_value = value.id_feature_value,
        custom = value.custom,
        "Feature value created",
    );

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok(
            "Feature value created",
            json!({
                "id_feature": id_feature,
                "id_feature_value": value.id_feature_value,
                "feature_value": value,
            }),
        )),
    ))
}

/// GET /api/v1/features/{id_feature}/values
pub async fn list_feature_values(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    query: Result<Query<LangParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id_feature) = path?;
    let Query(params) = query?;
    let id_lang = state.config.lang_or_default(params.id_lang);

    let values = feature_values::list_feature_values(&state.catalog, id_feature, id_lang)
        .await
        .during(
            "list feature values",
            json!({ "id_feature": id_feature, "id_lang": id_lang }),
        )?;

    Ok(Json(ActionResponse::ok(
        "Feature values retrieved",
        json!({ "id_feature": id_feature, "id_lang": id_lang, "feature_values": values }),
    )))
}
