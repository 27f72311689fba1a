//! Feature manager operations.
//!
//! Each function validates its input, calls the injected stores of a
//! [`Catalog`](crate::state::Catalog) and returns a plain `CoreResult`.
//! Rendering the outcome is the handler's job.

use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::{EntityKind, FeaturePair};
use featmgr_core::types::{DbId, LangId};
use featmgr_db::models::feature::{Feature, FeatureValue};

use crate::state::Catalog;

pub mod feature_values;
pub mod features;
pub mod orphans;
pub mod products;

/// Load a feature or fail with `NotFound`.
pub(crate) async fn require_feature(
    catalog: &Catalog,
    id: DbId,
    id_lang: LangId,
) -> CoreResult<Feature> {
    catalog
        .entities
        .load_feature(id, id_lang)
        .await?
        .ok_or(CoreError::NotFound {
            entity: EntityKind::Feature.label(),
            id,
        })
}

/// Load a feature value or fail with `NotFound`.
pub(crate) async fn require_feature_value(
    catalog: &Catalog,
    id: DbId,
    id_lang: LangId,
) -> CoreResult<FeatureValue> {
    catalog
        .entities
        .load_feature_value(id, id_lang)
        .await?
        .ok_or(CoreError::NotFound {
            entity: EntityKind::FeatureValue.label(),
            id,
        })
}

/// Check that `pair` names an existing value of an existing feature.
pub(crate) async fn require_pair(catalog: &Catalog, pair: FeaturePair) -> CoreResult<()> {
    const ANY_LANG: LangId = 0;

    require_feature(catalog, pair.id_feature, ANY_LANG).await?;
    let value = require_feature_value(catalog, pair.id_feature_value, ANY_LANG).await?;
    if value.id_feature != pair.id_feature {
        return Err(CoreError::Conflict(format!(
            "Feature value #{} does not belong to feature #{}",
            pair.id_feature_value, pair.id_feature
        )));
    }
    Ok(())
}
