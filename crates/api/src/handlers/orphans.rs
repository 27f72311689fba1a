//! Handlers for orphaned features and feature values.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use featmgr_core::bulk::BulkDeleteReport;
use featmgr_core::feature::EntityKind;
use featmgr_core::types::DbId;
use featmgr_db::models::feature::{
    LangParams, OrphanFeatureDeleteRequest, OrphanFeatureValueDeleteRequest,
};
use serde_json::{json, Value};

use crate::error::{AppResult, OperationContext};
use crate::response::ActionResponse;
use crate::services::orphans;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// GET /api/v1/orphans/features
pub async fn list_orphan_features(
    State(state): State<AppState>,
    query: Result<Query<LangParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let id_lang = state.config.lang_or_default(params.id_lang);

    let features = orphans::list_orphan_features(&state.catalog, id_lang)
        .await
        .during("list orphan features", json!({ "id_lang": id_lang }))?;

    Ok(Json(ActionResponse::ok(
        "Orphan Features retrieved",
        json!({ "id_lang": id_lang, "features": features }),
    )))
}

/// GET /api/v1/orphans/feature-values
pub async fn list_orphan_feature_values(
    State(state): State<AppState>,
    query: Result<Query<LangParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let id_lang = state.config.lang_or_default(params.id_lang);

    let values = orphans::list_orphan_feature_values(&state.catalog, id_lang)
        .await
        .during("list orphan feature values", json!({ "id_lang": id_lang }))?;

    Ok(Json(ActionResponse::ok(
        "Orphan Feature Values retrieved",
        json!({ "id_lang": id_lang, "feature_values": values }),
    )))
}

// ---------------------------------------------------------------------------
// Bulk delete
// ---------------------------------------------------------------------------

/// POST /api/v1/orphans/features/bulk-delete
///
/// `success` is false when at least one existing feature could not be
/// deleted; IDs that do not exist are reported as skipped.
pub async fn bulk_delete_orphan_features(
    State(state): State<AppState>,
    payload: Result<Json<OrphanFeatureDeleteRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let ids = input.feature_ids.into_vec();
    Ok(Json(
        bulk_delete(&state, EntityKind::Feature, "feature_ids", &ids).await,
    ))
}

/// POST /api/v1/orphans/feature-values/bulk-delete
pub async fn bulk_delete_orphan_feature_values(
    State(state): State<AppState>,
    payload: Result<Json<OrphanFeatureValueDeleteRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let ids = input.feature_value_ids.into_vec();
    Ok(Json(
        bulk_delete(&state, EntityKind::FeatureValue, "feature_value_ids", &ids).await,
    ))
}

async fn bulk_delete(
    state: &AppState,
    kind: EntityKind,
    ids_field: &str,
    ids: &[DbId],
) -> ActionResponse<Value> {
    let noun = match kind {
        EntityKind::Feature => "Features",
        EntityKind::FeatureValue => "Feature Values",
    };

    if ids.is_empty() {
        let message = match kind {
            EntityKind::Feature => "No features to delete",
            EntityKind::FeatureValue => "No feature values to delete",
        };
        return ActionResponse::ok(message, report_body(ids_field, ids, &BulkDeleteReport::default()));
    }

    let report = orphans::bulk_delete_orphans(&state.catalog, kind, ids).await;
    let deleted = report.deleted_ids();

    tracing::info!(
        kind = kind.label(),
        requested = ids.len(),
        deleted = deleted.len(),
        failed = report.failed_ids().len(),
        "Orphan bulk delete finished",
    );

    let success = report.all_succeeded();
    let message = if !success {
        format!("Some Orphan {noun} could not be deleted")
    } else if deleted.is_empty() {
        format!("No Orphan {noun} to delete")
    } else {
        format!("Orphan {noun} deleted")
    };

    ActionResponse {
        success,
        message,
        data: report_body(ids_field, ids, &report),
    }
}

fn report_body(ids_field: &str, ids: &[DbId], report: &BulkDeleteReport) -> Value {
    let mut body = json!({
        "deleted": report.deleted_ids(),
        "skipped": report.skipped_ids(),
        "failed": report.failed_ids(),
        "outcomes": report.outcomes,
    });
    if let Some(map) = body.as_object_mut() {
        map.insert(ids_field.to_string(), json!(ids));
    }
    body
}
