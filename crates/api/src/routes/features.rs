//! Route definitions for features, mounted at `/features`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::features;
use crate::state::AppState;

/// ```text
/// GET    /                        -> list_features
/// POST   /                        -> create_feature
/// DELETE /{id_feature}            -> delete_feature
/// GET    /{id_feature}/values     -> list_feature_values
/// POST   /{id_feature}/values     -> create_feature_value
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(features::list_features).post(features::create_feature),
        )
        .route("/{id_feature}", delete(features::delete_feature))
        .route(
            "/{id_feature}/values",
            get(features::list_feature_values).post(features::create_feature_value),
        )
}
