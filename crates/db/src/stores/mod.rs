//! Store interfaces consumed by the service layer.
//!
//! Services receive these as trait objects so the same operations run
//! against PostgreSQL ([`PgCatalog`]) or against memory ([`InMemoryCatalog`]).
//! Every method returns the core error taxonomy; driver errors are already
//! converted when they reach the caller.

use async_trait::async_trait;
use featmgr_core::error::CoreResult;
use featmgr_core::feature::{EntityKind, FeaturePair};
use featmgr_core::types::{DbId, LangId};

use crate::models::feature::{CreateFeature, CreateFeatureValue, Feature, FeatureValue};
use crate::models::product::{ProductQuery, ProductRow, TransferSummary};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryCatalog, ProductSeed};
pub use postgres::PgCatalog;

/// Read/write access to the product ↔ (feature, feature value) join table.
///
/// `bulk_insert`, `bulk_delete` and `transfer` reject the whole call with
/// `CoreError::InvalidProductId` if any ID is not positive, before touching
/// storage. An empty ID list is a successful no-op.
#[async_trait]
pub trait AssociationStore: Send + Sync {
    /// Associate products with `pair`; existing triples are left alone.
    async fn bulk_insert(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64>;

    /// Remove the association of each product with `pair`.
    async fn bulk_delete(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64>;

    /// Insert into `to` and delete from `from` atomically.
    async fn transfer(
        &self,
        from: FeaturePair,
        to: FeaturePair,
        product_ids: &[DbId],
    ) -> CoreResult<TransferSummary>;

    /// Every product associated with `pair`, regardless of shop or language.
    async fn product_ids(&self, pair: FeaturePair) -> CoreResult<Vec<DbId>>;

    /// Move a value and all of its associations from one feature to another
    /// atomically, returning the moved product IDs.
    ///
    /// Fails with `Conflict` if the value does not belong to `from_feature`.
    async fn relocate_value(
        &self,
        id_feature_value: DbId,
        from_feature: DbId,
        to_feature: DbId,
    ) -> CoreResult<Vec<DbId>>;
}

/// Read-only product resolution for one feature, language and shop.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn products_by_feature_value(&self, query: &ProductQuery) -> CoreResult<Vec<ProductRow>>;
}

/// Features and values without any association row.
#[async_trait]
pub trait OrphanFinder: Send + Sync {
    async fn orphan_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>>;

    async fn orphan_feature_values(&self, id_lang: LangId) -> CoreResult<Vec<FeatureValue>>;
}

/// Create, load and delete features and feature values.
///
/// `delete_*` return `Ok(false)` when the store refused the delete without
/// raising an error.
#[async_trait]
pub trait EntityGateway: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn ping(&self) -> CoreResult<()>;

    async fn create_feature(&self, input: &CreateFeature) -> CoreResult<Feature>;

    async fn load_feature(&self, id: DbId, id_lang: LangId) -> CoreResult<Option<Feature>>;

    async fn delete_feature(&self, id: DbId) -> CoreResult<bool>;

    async fn list_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>>;

    async fn create_feature_value(&self, input: &CreateFeatureValue) -> CoreResult<FeatureValue>;

    async fn load_feature_value(
        &self,
        id: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>>;

    async fn delete_feature_value(&self, id: DbId) -> CoreResult<bool>;

    /// Copy a value with all its translations under `target_feature`.
    async fn duplicate_feature_value(
        &self,
        id: DbId,
        target_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>>;

    async fn list_feature_values(
        &self,
        id_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Vec<FeatureValue>>;

    /// Whether an entity of `kind` exists. Localization is irrelevant here.
    async fn exists(&self, kind: EntityKind, id: DbId) -> CoreResult<bool> {
        const ANY_LANG: LangId = 0;
        Ok(match kind {
            EntityKind::Feature => self.load_feature(id, ANY_LANG).await?.is_some(),
            EntityKind::FeatureValue => self.load_feature_value(id, ANY_LANG).await?.is_some(),
        })
    }

    /// Delete an entity of `kind`.
    async fn delete(&self, kind: EntityKind, id: DbId) -> CoreResult<bool> {
        match kind {
            EntityKind::Feature => self.delete_feature(id).await,
            EntityKind::FeatureValue => self.delete_feature_value(id).await,
        }
    }
}
