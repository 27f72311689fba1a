//! Route definitions for product associations, mounted at `/products`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// ```text
/// GET    /            -> list_products
/// POST   /relocate    -> relocate_products
/// POST   /add         -> add_products
/// POST   /delete      -> delete_products
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products))
        .route("/relocate", post(products::relocate_products))
        .route("/add", post(products::add_products))
        .route("/delete", post(products::delete_products))
}
