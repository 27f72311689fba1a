//! Repository for the `feature_value` and `feature_value_lang` tables.

use featmgr_core::types::{DbId, LangId};
use sqlx::PgPool;

use crate::models::feature::{CreateFeatureValue, FeatureValue};
use crate::tables::Tables;

/// Provides CRUD and duplication for feature values.
pub struct FeatureValueRepo;

impl FeatureValueRepo {
    /// Insert a value under `input.id_feature` with its text in one language.
    pub async fn create(
        pool: &PgPool,
        tables: &Tables,
        input: &CreateFeatureValue,
    ) -> Result<FeatureValue, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO {} (id_feature, custom) VALUES ($1, $2) RETURNING id_feature_value",
            tables.feature_value
        );
        let id_feature_value: DbId = sqlx::query_scalar(&insert_query)
            .bind(input.id_feature)
            .bind(input.custom)
            .fetch_one(&mut *tx)
            .await?;

        let lang_query = format!(
            "INSERT INTO {} (id_feature_value, id_lang, value) VALUES ($1, $2, $3)",
            tables.feature_value_lang
        );
        sqlx::query(&lang_query)
            .bind(id_feature_value)
            .bind(input.id_lang)
            .bind(&input.value)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(FeatureValue {
            id_feature_value,
            id_feature: input.id_feature,
            custom: input.custom,
            value: Some(input.value.clone()),
        })
    }

    /// Find a value by ID, localized in `id_lang`.
    pub async fn find_by_id(
        pool: &PgPool,
        tables: &Tables,
        id: DbId,
        id_lang: LangId,
    ) -> Result<Option<FeatureValue>, sqlx::Error> {
        let query = format!(
            "SELECT fv.id_feature_value, fv.id_feature, fv.custom, fvl.value \
             FROM {fv} fv \
             LEFT JOIN {fvl} fvl ON (fvl.id_feature_value = fv.id_feature_value AND fvl.id_lang = $2) \
             WHERE fv.id_feature_value = $1",
            fv = tables.feature_value,
            fvl = tables.feature_value_lang,
        );
        sqlx::query_as::<_, FeatureValue>(&query)
            .bind(id)
            .bind(id_lang)
            .fetch_optional(pool)
            .await
    }

    /// List the values of one feature, localized in `id_lang`.
    pub async fn list_by_feature(
        pool: &PgPool,
        tables: &Tables,
        id_feature: DbId,
        id_lang: LangId,
    ) -> Result<Vec<FeatureValue>, sqlx::Error> {
        let query = format!(
            "SELECT fv.id_feature_value, fv.id_feature, fv.custom, fvl.value \
             FROM {fv} fv \
             LEFT JOIN {fvl} fvl ON (fvl.id_feature_value = fv.id_feature_value AND fvl.id_lang = $2) \
             WHERE fv.id_feature = $1 \
             ORDER BY fv.id_feature_value",
            fv = tables.feature_value,
            fvl = tables.feature_value_lang,
        );
        sqlx::query_as::<_, FeatureValue>(&query)
            .bind(id_feature)
            .bind(id_lang)
            .fetch_all(pool)
            .await
    }

    /// Copy a value (custom flag and every translation) under `target_feature`.
    ///
    /// Returns the copy localized in `id_lang`, or `None` if the source does
    /// not exist.
    pub async fn duplicate(
        pool: &PgPool,
        tables: &Tables,
        id: DbId,
        target_feature: DbId,
        id_lang: LangId,
    ) -> Result<Option<FeatureValue>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let copy_query = format!(
            "INSERT INTO {fv} (id_feature, custom) \
             SELECT $2, custom FROM {fv} WHERE id_feature_value = $1 \
             RETURNING id_feature_value",
            fv = tables.feature_value,
        );
        let new_id: Option<DbId> = sqlx::query_scalar(&copy_query)
            .bind(id)
            .bind(target_feature)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(new_id) = new_id else {
            return Ok(None);
        };

        let lang_query = format!(
            "INSERT INTO {fvl} (id_feature_value, id_lang, value) \
             SELECT $2, id_lang, value FROM {fvl} WHERE id_feature_value = $1",
            fvl = tables.feature_value_lang,
        );
        sqlx::query(&lang_query)
            .bind(id)
            .bind(new_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Self::find_by_id(pool, tables, new_id, id_lang).await
    }

    /// Delete a value, its translations and its association rows.
    ///
    /// Returns `true` if the value row was deleted.
    pub async fn delete(pool: &PgPool, tables: &Tables, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in [&tables.feature_product, &tables.feature_value_lang] {
            let query = format!("DELETE FROM {table} WHERE id_feature_value = $1");
            sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        }

        let query = format!(
            "DELETE FROM {} WHERE id_feature_value = $1",
            tables.feature_value
        );
        let result = sqlx::query(&query).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
