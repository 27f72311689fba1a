pub mod feature_values;
pub mod features;
pub mod health;
pub mod orphans;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /features                                         list, create
/// /features/{id_feature}                            delete
/// /features/{id_feature}/values                     list, create
///
/// /feature-values/{id_feature_value}                delete
/// /feature-values/{id_feature_value}/duplicate      copy under another feature (POST)
/// /feature-values/{id_feature_value}/relocate       move to another feature (POST)
///
/// /products                                         lookup by feature value (GET)
/// /products/relocate                                move between pairs (POST)
/// /products/add                                     associate with a pair (POST)
/// /products/delete                                  dissociate from a pair (POST)
///
/// /orphans/features                                 list (GET)
/// /orphans/features/bulk-delete                     delete by IDs (POST)
/// /orphans/feature-values                           list (GET)
/// /orphans/feature-values/bulk-delete               delete by IDs (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/features", features::router())
        .nest("/feature-values", feature_values::router())
        .nest("/products", products::router())
        .nest("/orphans", orphans::router())
}
