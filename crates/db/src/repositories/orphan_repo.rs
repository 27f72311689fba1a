//! Queries for features and feature values that no product references.

use featmgr_core::types::LangId;
use sqlx::PgPool;

use crate::models::feature::{Feature, FeatureValue};
use crate::tables::Tables;

/// Finds orphaned features and feature values.
pub struct OrphanRepo;

impl OrphanRepo {
    /// Features with no association row, each listed once.
    pub async fn features(
        pool: &PgPool,
        tables: &Tables,
        id_lang: LangId,
    ) -> Result<Vec<Feature>, sqlx::Error> {
        let query = format!(
            "SELECT f.id_feature, f.position, fl.name \
             FROM {feature} f \
             LEFT JOIN {feature_lang} fl ON (fl.id_feature = f.id_feature AND fl.id_lang = $1) \
             LEFT JOIN {feature_product} fp ON (fp.id_feature = f.id_feature) \
             WHERE fp.id_feature IS NULL \
             ORDER BY f.id_feature",
            feature = tables.feature,
            feature_lang = tables.feature_lang,
            feature_product = tables.feature_product,
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(id_lang)
            .fetch_all(pool)
            .await
    }

    /// Feature values with no association row, each listed once.
    pub async fn feature_values(
        pool: &PgPool,
        tables: &Tables,
        id_lang: LangId,
    ) -> Result<Vec<FeatureValue>, sqlx::Error> {
        let query = format!(
            "SELECT fv.id_feature_value, fv.id_feature, fv.custom, fvl.value \
             FROM {fv} fv \
             LEFT JOIN {fvl} fvl ON (fvl.id_feature_value = fv.id_feature_value AND fvl.id_lang = $1) \
             LEFT JOIN {fp} fp ON (fp.id_feature_value = fv.id_feature_value) \
             WHERE fp.id_feature_value IS NULL \
             ORDER BY fv.id_feature_value",
            fv = tables.feature_value,
            fvl = tables.feature_value_lang,
            fp = tables.feature_product,
        );
        sqlx::query_as::<_, FeatureValue>(&query)
            .bind(id_lang)
            .fetch_all(pool)
            .await
    }
}
