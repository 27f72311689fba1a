//! PostgreSQL-backed stores.
//!
//! [`PgCatalog`] owns the pool and the resolved table names and implements
//! every store interface by delegating to the repositories.

use std::sync::Arc;

use async_trait::async_trait;
use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::{EntityKind, FeaturePair};
use featmgr_core::ids::validate_product_ids;
use featmgr_core::types::{DbId, LangId};
use validator::Validate;

use super::{AssociationStore, EntityGateway, OrphanFinder, ProductLookup};
use crate::models::feature::{CreateFeature, CreateFeatureValue, Feature, FeatureValue};
use crate::models::product::{ProductQuery, ProductRow, TransferSummary};
use crate::repositories::{
    AssociationRepo, FeatureRepo, FeatureValueRepo, OrphanRepo, ProductRepo,
};
use crate::tables::Tables;
use crate::{map_sqlx_error, DbPool};

/// Catalog stores over one connection pool.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
    tables: Arc<Tables>,
}

impl PgCatalog {
    pub fn new(pool: DbPool, tables: Tables) -> Self {
        Self {
            pool,
            tables: Arc::new(tables),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }
}

fn invalid_input(err: validator::ValidationErrors) -> CoreError {
    CoreError::Validation(err.to_string())
}

// ---------------------------------------------------------------------------
// AssociationStore
// ---------------------------------------------------------------------------

#[async_trait]
impl AssociationStore for PgCatalog {
    #[tracing::instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    async fn bulk_insert(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64> {
        validate_product_ids(product_ids)?;
        if product_ids.is_empty() {
            return Ok(0);
        }
        AssociationRepo::bulk_insert(&self.pool, &self.tables, pair, product_ids)
            .await
            .map_err(|e| map_sqlx_error("bulk_insert", e))
    }

    #[tracing::instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    async fn bulk_delete(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64> {
        validate_product_ids(product_ids)?;
        if product_ids.is_empty() {
            return Ok(0);
        }
        AssociationRepo::bulk_delete(&self.pool, &self.tables, pair, product_ids)
            .await
            .map_err(|e| map_sqlx_error("bulk_delete", e))
    }

    #[tracing::instrument(skip(self, product_ids), fields(products = product_ids.len()))]
    async fn transfer(
        &self,
        from: FeaturePair,
        to: FeaturePair,
        product_ids: &[DbId],
    ) -> CoreResult<TransferSummary> {
        validate_product_ids(product_ids)?;
        from.ensure_distinct(to)?;
        if product_ids.is_empty() {
            return Ok(TransferSummary::default());
        }
        AssociationRepo::transfer(&self.pool, &self.tables, from, to, product_ids)
            .await
            .map_err(|e| map_sqlx_error("transfer", e))
    }

    async fn product_ids(&self, pair: FeaturePair) -> CoreResult<Vec<DbId>> {
        AssociationRepo::product_ids(&self.pool, &self.tables, pair)
            .await
            .map_err(|e| map_sqlx_error("product_ids", e))
    }

    #[tracing::instrument(skip(self))]
    async fn relocate_value(
        &self,
        id_feature_value: DbId,
        from_feature: DbId,
        to_feature: DbId,
    ) -> CoreResult<Vec<DbId>> {
        if from_feature == to_feature {
            return Err(CoreError::Validation(
                "feature value is already attached to that feature".into(),
            ));
        }
        let moved = AssociationRepo::relocate_value(
            &self.pool,
            &self.tables,
            id_feature_value,
            from_feature,
            to_feature,
        )
        .await
        .map_err(|e| map_sqlx_error("relocate_value", e))?;

        if let Some(moved) = moved {
            return Ok(moved);
        }

        // Nothing moved: tell a missing value apart from one under another feature.
        let current = FeatureValueRepo::find_by_id(&self.pool, &self.tables, id_feature_value, 0)
            .await
            .map_err(|e| map_sqlx_error("relocate_value", e))?;
        Err(match current {
            Some(_) => CoreError::Conflict(format!(
                "feature value #{id_feature_value} does not belong to feature #{from_feature}"
            )),
            None => CoreError::NotFound {
                entity: EntityKind::FeatureValue.label(),
                id: id_feature_value,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// ProductLookup / OrphanFinder
// ---------------------------------------------------------------------------

#[async_trait]
impl ProductLookup for PgCatalog {
    async fn products_by_feature_value(&self, query: &ProductQuery) -> CoreResult<Vec<ProductRow>> {
        ProductRepo::by_feature_value(&self.pool, &self.tables, query)
            .await
            .map_err(|e| map_sqlx_error("products_by_feature_value", e))
    }
}

#[async_trait]
impl OrphanFinder for PgCatalog {
    async fn orphan_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>> {
        OrphanRepo::features(&self.pool, &self.tables, id_lang)
            .await
            .map_err(|e| map_sqlx_error("orphan_features", e))
    }

    async fn orphan_feature_values(&self, id_lang: LangId) -> CoreResult<Vec<FeatureValue>> {
        OrphanRepo::feature_values(&self.pool, &self.tables, id_lang)
            .await
            .map_err(|e| map_sqlx_error("orphan_feature_values", e))
    }
}

// ---------------------------------------------------------------------------
// EntityGateway
// ---------------------------------------------------------------------------

#[async_trait]
impl EntityGateway for PgCatalog {
    async fn ping(&self) -> CoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))
    }

    async fn create_feature(&self, input: &CreateFeature) -> CoreResult<Feature> {
        input.validate().map_err(invalid_input)?;
        FeatureRepo::create(&self.pool, &self.tables, input)
            .await
            .map_err(|e| map_sqlx_error("create_feature", e))
    }

    async fn load_feature(&self, id: DbId, id_lang: LangId) -> CoreResult<Option<Feature>> {
        FeatureRepo::find_by_id(&self.pool, &self.tables, id, id_lang)
            .await
            .map_err(|e| map_sqlx_error("load_feature", e))
    }

    async fn delete_feature(&self, id: DbId) -> CoreResult<bool> {
        FeatureRepo::delete(&self.pool, &self.tables, id)
            .await
            .map_err(|e| map_sqlx_error("delete_feature", e))
    }

    async fn list_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>> {
        FeatureRepo::list_by_lang(&self.pool, &self.tables, id_lang)
            .await
            .map_err(|e| map_sqlx_error("list_features", e))
    }

    async fn create_feature_value(&self, input: &CreateFeatureValue) -> CoreResult<FeatureValue> {
        input.validate().map_err(invalid_input)?;
        FeatureValueRepo::create(&self.pool, &self.tables, input)
            .await
            .map_err(|e| map_sqlx_error("create_feature_value", e))
    }

    async fn load_feature_value(
        &self,
        id: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>> {
        FeatureValueRepo::find_by_id(&self.pool, &self.tables, id, id_lang)
            .await
            .map_err(|e| map_sqlx_error("load_feature_value", e))
    }

    async fn delete_feature_value(&self, id: DbId) -> CoreResult<bool> {
        FeatureValueRepo::delete(&self.pool, &self.tables, id)
            .await
            .map_err(|e| map_sqlx_error("delete_feature_value", e))
    }

    async fn duplicate_feature_value(
        &self,
        id: DbId,
        target_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>> {
        FeatureValueRepo::duplicate(&self.pool, &self.tables, id, target_feature, id_lang)
            .await
            .map_err(|e| map_sqlx_error("duplicate_feature_value", e))
    }

    async fn list_feature_values(
        &self,
        id_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Vec<FeatureValue>> {
        FeatureValueRepo::list_by_feature(&self.pool, &self.tables, id_feature, id_lang)
            .await
            .map_err(|e| map_sqlx_error("list_feature_values", e))
    }
}
