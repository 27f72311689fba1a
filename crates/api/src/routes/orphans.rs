//! Route definitions for orphan cleanup, mounted at `/orphans`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orphans;
use crate::state::AppState;

/// ```text
/// GET    /features                        -> list_orphan_features
/// POST   /features/bulk-delete            -> bulk_delete_orphan_features
/// GET    /feature-values                  -> list_orphan_feature_values
/// POST   /feature-values/bulk-delete      -> bulk_delete_orphan_feature_values
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/features", get(orphans::list_orphan_features))
        .route(
            "/features/bulk-delete",
            post(orphans::bulk_delete_orphan_features),
        )
        .route("/feature-values", get(orphans::list_orphan_feature_values))
        .route(
            "/feature-values/bulk-delete",
            post(orphans::bulk_delete_orphan_feature_values),
        )
}
