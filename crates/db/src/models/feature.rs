//! Feature and feature value models and DTOs.

use featmgr_core::ids::IdList;
use featmgr_core::types::{DbId, LangId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A feature with its name in one language.
///
/// `name` is `None` when the feature has no translation for that language.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Feature {
    pub id_feature: DbId,
    pub position: i32,
    pub name: Option<String>,
}

/// A feature value with its text in one language.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct FeatureValue {
    pub id_feature_value: DbId,
    pub id_feature: DbId,
    pub custom: bool,
    pub value: Option<String>,
}

// ---------------------------------------------------------------------------
// Store inputs
// ---------------------------------------------------------------------------

/// Input for creating a feature with a name in a single language.
#[derive(Debug, Clone, Validate)]
pub struct CreateFeature {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub id_lang: LangId,
}

/// Input for creating a value under an existing feature.
#[derive(Debug, Clone, Validate)]
pub struct CreateFeatureValue {
    pub id_feature: DbId,
    #[validate(length(min = 1, max = 255))]
    pub value: String,
    pub custom: bool,
    pub id_lang: LangId,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Body of `POST /features`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeatureRequest {
    #[serde(default)]
    pub name: String,
    /// Language of `name`. Defaults to the configured language.
    pub id_lang: Option<LangId>,
}

/// Body of `POST /features/{id_feature}/values`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeatureValueRequest {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub custom: bool,
    pub id_lang: Option<LangId>,
}

/// Body of `POST /feature-values/{id_feature_value}/duplicate`.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicateFeatureValueRequest {
    /// Feature that will own the copy.
    #[serde(default)]
    pub id_feature: DbId,
    pub id_lang: Option<LangId>,
}

/// Body of `POST /feature-values/{id_feature_value}/relocate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelocateFeatureValueRequest {
    /// Feature the value currently belongs to.
    #[serde(default)]
    pub id_feature: DbId,
    #[serde(default)]
    pub new_id_feature: DbId,
    pub id_lang: Option<LangId>,
}

/// Query parameters carrying an optional language.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LangParams {
    pub id_lang: Option<LangId>,
}

/// Body of `POST /orphans/features/bulk-delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrphanFeatureDeleteRequest {
    #[serde(default)]
    pub feature_ids: IdList,
}

/// Body of `POST /orphans/feature-values/bulk-delete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrphanFeatureValueDeleteRequest {
    #[serde(default)]
    pub feature_value_ids: IdList,
}
