//! Product lookup rows and association DTOs.

use featmgr_core::feature::FeatureValueFilter;
use featmgr_core::ids::IdList;
use featmgr_core::types::{DbId, LangId, ShopId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One product carrying a feature value, denormalized for display.
///
/// A product appears once per matching association row; rows are not
/// deduplicated across feature values.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ProductRow {
    pub id_product: DbId,
    pub id_supplier: DbId,
    pub supplier: Option<String>,
    pub id_manufacturer: DbId,
    pub manufacturer: Option<String>,
    pub reference: Option<String>,
    pub active: bool,
    pub id_lang: LangId,
    pub name: String,
    pub id_shop: ShopId,
    pub id_category_default: DbId,
    pub category: String,
    pub id_feature: DbId,
    pub feature: Option<String>,
    pub id_feature_value: DbId,
    pub value: Option<String>,
}

/// A row of the association table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, FromRow, Serialize)]
pub struct Association {
    pub id_feature: DbId,
    pub id_product: DbId,
    pub id_feature_value: DbId,
}

/// Scope of a product lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub id_feature: DbId,
    pub filter: FeatureValueFilter,
    pub id_lang: LangId,
    pub id_shop: ShopId,
}

/// Row counts of an atomic transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub inserted: u64,
    pub deleted: u64,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Query parameters for `GET /products`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    #[serde(default)]
    pub id_feature: DbId,
    /// One value, a comma-separated list, or absent for every value.
    #[serde(default)]
    pub id_feature_value: IdList,
    pub id_lang: Option<LangId>,
    pub id_shop: Option<ShopId>,
}

/// Body of `POST /products/relocate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRelocateRequest {
    #[serde(default)]
    pub id_feature: DbId,
    #[serde(default)]
    pub id_feature_value: DbId,
    #[serde(default)]
    pub new_id_feature: DbId,
    #[serde(default)]
    pub new_id_feature_value: DbId,
    #[serde(default)]
    pub id_products: IdList,
}

/// Body of `POST /products/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductAddRequest {
    #[serde(default)]
    pub new_id_feature: DbId,
    #[serde(default)]
    pub new_id_feature_value: DbId,
    #[serde(default)]
    pub id_products: IdList,
}

/// Body of `POST /products/delete`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDeleteRequest {
    #[serde(default)]
    pub id_feature: DbId,
    #[serde(default)]
    pub id_feature_value: DbId,
    #[serde(default)]
    pub id_products: IdList,
}
