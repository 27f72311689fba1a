//! Repository for the `feature` and `feature_lang` tables.

use featmgr_core::types::{DbId, LangId};
use sqlx::PgPool;

use crate::models::feature::{CreateFeature, Feature};
use crate::tables::Tables;

/// Provides CRUD operations for features.
pub struct FeatureRepo;

impl FeatureRepo {
    /// Insert a feature at the end of the position order, with its name in one language.
    pub async fn create(
        pool: &PgPool,
        tables: &Tables,
        input: &CreateFeature,
    ) -> Result<Feature, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Concurrent creates would otherwise read the same MAX(position).
        let lock_query = format!(
            "LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE",
            tables.feature
        );
        sqlx::query(&lock_query).execute(&mut *tx).await?;

        let insert_query = format!(
            "INSERT INTO {feature} (position) \
             SELECT COALESCE(MAX(position) + 1, 0) FROM {feature} \
             RETURNING id_feature, position",
            feature = tables.feature,
        );
        let (id_feature, position): (DbId, i32) = sqlx::query_as(&insert_query)
            .fetch_one(&mut *tx)
            .await?;

        let lang_query = format!(
            "INSERT INTO {} (id_feature, id_lang, name) VALUES ($1, $2, $3)",
            tables.feature_lang
        );
        sqlx::query(&lang_query)
            .bind(id_feature)
            .bind(input.id_lang)
            .bind(&input.name)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Feature {
            id_feature,
            position,
            name: Some(input.name.clone()),
        })
    }

    /// Find a feature by ID, localized in `id_lang`.
    pub async fn find_by_id(
        pool: &PgPool,
        tables: &Tables,
        id: DbId,
        id_lang: LangId,
    ) -> Result<Option<Feature>, sqlx::Error> {
        let query = format!(
            "SELECT f.id_feature, f.position, fl.name \
             FROM {feature} f \
             LEFT JOIN {feature_lang} fl ON (fl.id_feature = f.id_feature AND fl.id_lang = $2) \
             WHERE f.id_feature = $1",
            feature = tables.feature,
            feature_lang = tables.feature_lang,
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(id)
            .bind(id_lang)
            .fetch_optional(pool)
            .await
    }

    /// List every feature in position order, localized in `id_lang`.
    pub async fn list_by_lang(
        pool: &PgPool,
        tables: &Tables,
        id_lang: LangId,
    ) -> Result<Vec<Feature>, sqlx::Error> {
        let query = format!(
            "SELECT f.id_feature, f.position, fl.name \
             FROM {feature} f \
             LEFT JOIN {feature_lang} fl ON (fl.id_feature = f.id_feature AND fl.id_lang = $1) \
             ORDER BY f.position, f.id_feature",
            feature = tables.feature,
            feature_lang = tables.feature_lang,
        );
        sqlx::query_as::<_, Feature>(&query)
            .bind(id_lang)
            .fetch_all(pool)
            .await
    }

    /// Delete a feature together with its translations, its values and
    /// every association row that references it.
    ///
    /// Returns `true` if the feature row was deleted.
    pub async fn delete(pool: &PgPool, tables: &Tables, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let statements = [
            format!("DELETE FROM {} WHERE id_feature = $1", tables.feature_product),
            format!(
                "DELETE FROM {fvl} WHERE id_feature_value IN \
                 (SELECT id_feature_value FROM {fv} WHERE id_feature = $1)",
                fvl = tables.feature_value_lang,
                fv = tables.feature_value,
            ),
            format!("DELETE FROM {} WHERE id_feature = $1", tables.feature_value),
            format!("DELETE FROM {} WHERE id_feature = $1", tables.feature_lang),
        ];
        for statement in &statements {
            sqlx::query(statement).bind(id).execute(&mut *tx).await?;
        }

        let query = format!("DELETE FROM {} WHERE id_feature = $1", tables.feature);
        let result = sqlx::query(&query).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
