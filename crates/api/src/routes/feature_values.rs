//! Route definitions for single feature values, mounted at `/feature-values`.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::feature_values;
use crate::state::AppState;

/// ```text
/// DELETE /{id_feature_value}              -> delete_feature_value
/// POST   /{id_feature_value}/duplicate    -> duplicate_feature_value
/// POST   /{id_feature_value}/relocate     -> relocate_feature_value
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id_feature_value}",
            delete(feature_values::delete_feature_value),
        )
        .route(
            "/{id_feature_value}/duplicate",
            post(feature_values::duplicate_feature_value),
        )
        .route(
            "/{id_feature_value}/relocate",
            post(feature_values::relocate_feature_value),
        )
}
