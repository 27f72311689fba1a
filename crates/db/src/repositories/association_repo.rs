//! Repository for the `feature_product` association table.
//!
//! Callers validate product IDs before reaching this layer; every statement
//! here binds the ID list as a single `BIGINT[]` parameter.

use featmgr_core::feature::FeaturePair;
use featmgr_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::product::TransferSummary;
use crate::tables::Tables;

/// Provides bulk insert/delete and atomic moves of association rows.
pub struct AssociationRepo;

impl AssociationRepo {
    /// Insert one row per product for `pair`, ignoring rows that already exist.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn bulk_insert(
        pool: &PgPool,
        tables: &Tables,
        pair: FeaturePair,
        product_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&insert_sql(tables))
            .bind(pair.id_feature)
            .bind(pair.id_feature_value)
            .bind(product_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete the rows of `pair` whose product is in `product_ids`.
    ///
    /// Returns the number of rows deleted.
    pub async fn bulk_delete(
        pool: &PgPool,
        tables: &Tables,
        pair: FeaturePair,
        product_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(&delete_sql(tables))
            .bind(pair.id_feature)
            .bind(pair.id_feature_value)
            .bind(product_ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Move products from `from` to `to` in one transaction.
    pub async fn transfer(
        pool: &PgPool,
        tables: &Tables,
        from: FeaturePair,
        to: FeaturePair,
        product_ids: &[DbId],
    ) -> Result<TransferSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let summary = Self::transfer_inner(&mut tx, tables, from, to, product_ids).await?;
        tx.commit().await?;
        Ok(summary)
    }

    /// IDs of every product associated with `pair`, in ascending order.
    pub async fn product_ids(
        pool: &PgPool,
        tables: &Tables,
        pair: FeaturePair,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let query = format!(
            "SELECT id_product FROM {} \
             WHERE id_feature = $1 AND id_feature_value = $2 \
             ORDER BY id_product",
            tables.feature_product
        );
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(pair.id_feature)
            .bind(pair.id_feature_value)
            .fetch_all(pool)
            .await
    }

    /// Re-parent a feature value and move all of its association rows from
    /// `from_feature` to `to_feature`, in one transaction.
    ///
    /// Returns the moved product IDs, or `None` when the value does not exist
    /// or no longer belongs to `from_feature` (nothing is changed then).
    pub async fn relocate_value(
        pool: &PgPool,
        tables: &Tables,
        id_feature_value: DbId,
        from_feature: DbId,
        to_feature: DbId,
    ) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let reparent_query = format!(
            "UPDATE {} SET id_feature = $3 \
             WHERE id_feature_value = $1 AND id_feature = $2",
            tables.feature_value
        );
        let reparented = sqlx::query(&reparent_query)
            .bind(id_feature_value)
            .bind(from_feature)
            .bind(to_feature)
            .execute(&mut *tx)
            .await?;

        if reparented.rows_affected() == 0 {
            return Ok(None);
        }

        let select_query = format!(
            "SELECT id_product FROM {} \
             WHERE id_feature = $1 AND id_feature_value = $2 \
             ORDER BY id_product \
             FOR UPDATE",
            tables.feature_product
        );
        let product_ids: Vec<DbId> = sqlx::query_scalar(&select_query)
            .bind(from_feature)
            .bind(id_feature_value)
            .fetch_all(&mut *tx)
            .await?;

        if !product_ids.is_empty() {
            let from = FeaturePair {
                id_feature: from_feature,
                id_feature_value,
            };
            let to = FeaturePair {
                id_feature: to_feature,
                id_feature_value,
            };
            Self::transfer_inner(&mut tx, tables, from, to, &product_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(product_ids))
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Insert-into-new then delete-from-old within an existing transaction.
    async fn transfer_inner(
        tx: &mut Transaction<'_, Postgres>,
        tables: &Tables,
        from: FeaturePair,
        to: FeaturePair,
        product_ids: &[DbId],
    ) -> Result<TransferSummary, sqlx::Error> {
        let inserted = sqlx::query(&insert_sql(tables))
            .bind(to.id_feature)
            .bind(to.id_feature_value)
            .bind(product_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query(&delete_sql(tables))
            .bind(from.id_feature)
            .bind(from.id_feature_value)
            .bind(product_ids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(TransferSummary { inserted, deleted })
    }
}

// ---------------------------------------------------------------------------
// SQL
// ---------------------------------------------------------------------------

/// Multi-row insert over `UNNEST($3)`; `$1` feature, `$2` feature value.
fn insert_sql(tables: &Tables) -> String {
    format!(
        "INSERT INTO {} (id_feature, id_product, id_feature_value) \
         SELECT $1::BIGINT, p.id_product, $2::BIGINT FROM UNNEST($3::BIGINT[]) AS p(id_product) \
         ON CONFLICT DO NOTHING",
        tables.feature_product
    )
}

fn delete_sql(tables: &Tables) -> String {
    format!(
        "DELETE FROM {} \
         WHERE id_feature = $1 AND id_feature_value = $2 AND id_product = ANY($3)",
        tables.feature_product
    )
}
