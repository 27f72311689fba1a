//! In-memory stores for tests and local development.
//!
//! Mirrors the semantics of the PostgreSQL implementation: inserts ignore
//! existing triples, deletes and transfers validate product IDs before any
//! mutation, and a transfer applies under a single write lock.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::{EntityKind, FeaturePair};
use featmgr_core::ids::validate_product_ids;
use featmgr_core::types::{DbId, LangId, ShopId};
use validator::Validate;

use super::{AssociationStore, EntityGateway, OrphanFinder, ProductLookup};
use crate::models::feature::{CreateFeature, CreateFeatureValue, Feature, FeatureValue};
use crate::models::product::{Association, ProductQuery, ProductRow, TransferSummary};

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

/// A product as the lookup sees it: names per language and default
/// category per shop.
#[derive(Debug, Clone, Default)]
pub struct ProductSeed {
    pub id_product: DbId,
    pub id_supplier: DbId,
    pub id_manufacturer: DbId,
    pub reference: Option<String>,
    pub active: bool,
    pub names: HashMap<LangId, String>,
    /// `id_shop -> id_category_default`
    pub shops: HashMap<ShopId, DbId>,
}

impl ProductSeed {
    /// An active product named in one language and listed in one shop.
    pub fn simple(
        id_product: DbId,
        id_lang: LangId,
        name: &str,
        id_shop: ShopId,
        id_category_default: DbId,
    ) -> Self {
        Self {
            id_product,
            active: true,
            names: HashMap::from([(id_lang, name.to_string())]),
            shops: HashMap::from([(id_shop, id_category_default)]),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
struct FeatureRecord {
    position: i32,
    names: HashMap<LangId, String>,
}

#[derive(Debug, Clone)]
struct ValueRecord {
    id_feature: DbId,
    custom: bool,
    texts: HashMap<LangId, String>,
}

#[derive(Debug, Default)]
struct CatalogData {
    last_feature_id: DbId,
    last_value_id: DbId,
    features: BTreeMap<DbId, FeatureRecord>,
    values: BTreeMap<DbId, ValueRecord>,
    products: BTreeMap<DbId, ProductSeed>,
    categories: HashMap<(DbId, LangId), String>,
    suppliers: HashMap<DbId, String>,
    manufacturers: HashMap<DbId, String>,
    associations: BTreeSet<Association>,
    refused_deletes: HashSet<(EntityKind, DbId)>,
}

impl CatalogData {
    fn feature(&self, id: DbId, id_lang: LangId) -> Option<Feature> {
        self.features.get(&id).map(|record| Feature {
            id_feature: id,
            position: record.position,
            name: record.names.get(&id_lang).cloned(),
        })
    }

    fn feature_value(&self, id: DbId, id_lang: LangId) -> Option<FeatureValue> {
        self.values.get(&id).map(|record| FeatureValue {
            id_feature_value: id,
            id_feature: record.id_feature,
            custom: record.custom,
            value: record.texts.get(&id_lang).cloned(),
        })
    }

    fn insert_pair(&mut self, pair: FeaturePair, product_ids: &[DbId]) -> u64 {
        let mut inserted = 0;
        for &id_product in product_ids {
            if self.associations.insert(association(pair, id_product)) {
                inserted += 1;
            }
        }
        inserted
    }

    fn delete_pair(&mut self, pair: FeaturePair, product_ids: &[DbId]) -> u64 {
        let mut deleted = 0;
        for &id_product in product_ids {
            if self.associations.remove(&association(pair, id_product)) {
                deleted += 1;
            }
        }
        deleted
    }

    fn products_of(&self, pair: FeaturePair) -> Vec<DbId> {
        let mut ids: Vec<DbId> = self
            .associations
            .iter()
            .filter(|a| a.id_feature == pair.id_feature && a.id_feature_value == pair.id_feature_value)
            .map(|a| a.id_product)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn product_row(&self, assoc: &Association, query: &ProductQuery) -> Option<ProductRow> {
        let product = self.products.get(&assoc.id_product)?;
        let name = product.names.get(&query.id_lang)?;
        let &id_category_default = product.shops.get(&query.id_shop)?;
        let category = self.categories.get(&(id_category_default, query.id_lang))?;
        let feature = self.features.get(&assoc.id_feature)?.names.get(&query.id_lang)?;
        let value = self
            .values
            .get(&assoc.id_feature_value)?
            .texts
            .get(&query.id_lang)?;

        Some(ProductRow {
            id_product: product.id_product,
            id_supplier: product.id_supplier,
            supplier: self.suppliers.get(&product.id_supplier).cloned(),
            id_manufacturer: product.id_manufacturer,
            manufacturer: self.manufacturers.get(&product.id_manufacturer).cloned(),
            reference: product.reference.clone(),
            active: product.active,
            id_lang: query.id_lang,
            name: name.clone(),
            id_shop: query.id_shop,
            id_category_default,
            category: category.clone(),
            id_feature: assoc.id_feature,
            feature: Some(feature.clone()),
            id_feature_value: assoc.id_feature_value,
            value: Some(value.clone()),
        })
    }
}

fn association(pair: FeaturePair, id_product: DbId) -> Association {
    Association {
        id_feature: pair.id_feature,
        id_product,
        id_feature_value: pair.id_feature_value,
    }
}

// ---------------------------------------------------------------------------
// InMemoryCatalog
// ---------------------------------------------------------------------------

/// Catalog stores held behind one lock.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    data: RwLock<CatalogData>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicked writer leaves whole-statement state behind, so the data
    // is still consistent after poisoning.
    fn read(&self) -> RwLockReadGuard<'_, CatalogData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a feature with a fixed ID and its translations.
    pub fn insert_feature(&self, id_feature: DbId, names: &[(LangId, &str)]) {
        let mut data = self.write();
        let position = next_position(&data);
        data.last_feature_id = data.last_feature_id.max(id_feature);
        data.features.insert(
            id_feature,
            FeatureRecord {
                position,
                names: to_translations(names),
            },
        );
    }

    /// Insert a value with a fixed ID under `id_feature`.
    pub fn insert_feature_value(
        &self,
        id_feature_value: DbId,
        id_feature: DbId,
        texts: &[(LangId, &str)],
    ) {
        let mut data = self.write();
        data.last_value_id = data.last_value_id.max(id_feature_value);
        data.values.insert(
            id_feature_value,
            ValueRecord {
                id_feature,
                custom: false,
                texts: to_translations(texts),
            },
        );
    }

    pub fn insert_product(&self, product: ProductSeed) {
        self.write().products.insert(product.id_product, product);
    }

    pub fn insert_category(&self, id_category: DbId, id_lang: LangId, name: &str) {
        self.write()
            .categories
            .insert((id_category, id_lang), name.to_string());
    }

    pub fn insert_supplier(&self, id_supplier: DbId, name: &str) {
        self.write().suppliers.insert(id_supplier, name.to_string());
    }

    pub fn insert_manufacturer(&self, id_manufacturer: DbId, name: &str) {
        self.write()
            .manufacturers
            .insert(id_manufacturer, name.to_string());
    }

    /// Add association rows directly, bypassing validation.
    pub fn associate(&self, id_feature: DbId, id_feature_value: DbId, product_ids: &[DbId]) {
        let pair = FeaturePair {
            id_feature,
            id_feature_value,
        };
        self.write().insert_pair(pair, product_ids);
    }

    /// Snapshot of every association row, in key order.
    pub fn associations(&self) -> Vec<Association> {
        self.read().associations.iter().copied().collect()
    }

    /// Make future deletes of one entity report failure without removing it.
    pub fn refuse_delete(&self, kind: EntityKind, id: DbId) {
        self.write().refused_deletes.insert((kind, id));
    }
}

fn next_position(data: &CatalogData) -> i32 {
    data.features
        .values()
        .map(|f| f.position + 1)
        .max()
        .unwrap_or(0)
}

fn to_translations(entries: &[(LangId, &str)]) -> HashMap<LangId, String> {
    entries
        .iter()
        .map(|(lang, text)| (*lang, (*text).to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Store implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl AssociationStore for InMemoryCatalog {
    async fn bulk_insert(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64> {
        validate_product_ids(product_ids)?;
        Ok(self.write().insert_pair(pair, product_ids))
    }

    async fn bulk_delete(&self, pair: FeaturePair, product_ids: &[DbId]) -> CoreResult<u64> {
        validate_product_ids(product_ids)?;
        Ok(self.write().delete_pair(pair, product_ids))
    }

    async fn transfer(
        &self,
        from: FeaturePair,
        to: FeaturePair,
        product_ids: &[DbId],
    ) -> CoreResult<TransferSummary> {
        validate_product_ids(product_ids)?;
        from.ensure_distinct(to)?;
        let mut data = self.write();
        let inserted = data.insert_pair(to, product_ids);
        let deleted = data.delete_pair(from, product_ids);
        Ok(TransferSummary { inserted, deleted })
    }

    async fn product_ids(&self, pair: FeaturePair) -> CoreResult<Vec<DbId>> {
        Ok(self.read().products_of(pair))
    }

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
        let mut data = self.write();
        match data.values.get_mut(&id_feature_value) {
            Some(record) if record.id_feature == from_feature => record.id_feature = to_feature,
            Some(_) => {
                return Err(CoreError::Conflict(format!(
                    "feature value #{id_feature_value} does not belong to feature #{from_feature}"
                )))
            }
            None => {
                return Err(CoreError::NotFound {
                    entity: EntityKind::FeatureValue.label(),
                    id: id_feature_value,
                })
            }
        }

        let from = FeaturePair {
            id_feature: from_feature,
            id_feature_value,
        };
        let to = FeaturePair {
            id_feature: to_feature,
            id_feature_value,
        };
        let moved = data.products_of(from);
        data.insert_pair(to, &moved);
        data.delete_pair(from, &moved);
        Ok(moved)
    }
}

#[async_trait]
impl ProductLookup for InMemoryCatalog {
    async fn products_by_feature_value(&self, query: &ProductQuery) -> CoreResult<Vec<ProductRow>> {
        let data = self.read();
        let mut rows: Vec<ProductRow> = data
            .associations
            .iter()
            .filter(|a| a.id_feature == query.id_feature && query.filter.matches(a.id_feature_value))
            .filter_map(|a| data.product_row(a, query))
            .collect();
        rows.sort_by_key(|row| (row.id_product, row.id_feature_value));
        Ok(rows)
    }
}

#[async_trait]
impl OrphanFinder for InMemoryCatalog {
    async fn orphan_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>> {
        let data = self.read();
        let used: HashSet<DbId> = data.associations.iter().map(|a| a.id_feature).collect();
        Ok(data
            .features
            .keys()
            .filter(|id| !used.contains(*id))
            .filter_map(|&id| data.feature(id, id_lang))
            .collect())
    }

    async fn orphan_feature_values(&self, id_lang: LangId) -> CoreResult<Vec<FeatureValue>> {
        let data = self.read();
        let used: HashSet<DbId> = data
            .associations
            .iter()
            .map(|a| a.id_feature_value)
            .collect();
        Ok(data
            .values
            .keys()
            .filter(|id| !used.contains(*id))
            .filter_map(|&id| data.feature_value(id, id_lang))
            .collect())
    }
}

#[async_trait]
impl EntityGateway for InMemoryCatalog {
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }

    async fn create_feature(&self, input: &CreateFeature) -> CoreResult<Feature> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let mut data = self.write();
        data.last_feature_id += 1;
        let id_feature = data.last_feature_id;
        let position = next_position(&data);
        data.features.insert(
            id_feature,
            FeatureRecord {
                position,
                names: HashMap::from([(input.id_lang, input.name.clone())]),
            },
        );
        Ok(Feature {
            id_feature,
            position,
            name: Some(input.name.clone()),
        })
    }

    async fn load_feature(&self, id: DbId, id_lang: LangId) -> CoreResult<Option<Feature>> {
        Ok(self.read().feature(id, id_lang))
    }

    async fn delete_feature(&self, id: DbId) -> CoreResult<bool> {
        let mut data = self.write();
        if data.refused_deletes.contains(&(EntityKind::Feature, id)) {
            return Ok(false);
        }
        if data.features.remove(&id).is_none() {
            return Ok(false);
        }
        data.values.retain(|_, value| value.id_feature != id);
        data.associations.retain(|a| a.id_feature != id);
        Ok(true)
    }

    async fn list_features(&self, id_lang: LangId) -> CoreResult<Vec<Feature>> {
        let data = self.read();
        let mut features: Vec<Feature> = data
            .features
            .keys()
            .filter_map(|&id| data.feature(id, id_lang))
            .collect();
        features.sort_by_key(|f| (f.position, f.id_feature));
        Ok(features)
    }

    async fn create_feature_value(&self, input: &CreateFeatureValue) -> CoreResult<FeatureValue> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let mut data = self.write();
        data.last_value_id += 1;
        let id_feature_value = data.last_value_id;
        data.values.insert(
            id_feature_value,
            ValueRecord {
                id_feature: input.id_feature,
                custom: input.custom,
                texts: HashMap::from([(input.id_lang, input.value.clone())]),
            },
        );
        Ok(FeatureValue {
            id_feature_value,
            id_feature: input.id_feature,
            custom: input.custom,
            value: Some(input.value.clone()),
        })
    }

    async fn load_feature_value(
        &self,
        id: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>> {
        Ok(self.read().feature_value(id, id_lang))
    }

    async fn delete_feature_value(&self, id: DbId) -> CoreResult<bool> {
        let mut data = self.write();
        if data.refused_deletes.contains(&(EntityKind::FeatureValue, id)) {
            return Ok(false);
        }
        if data.values.remove(&id).is_none() {
            return Ok(false);
        }
        data.associations.retain(|a| a.id_feature_value != id);
        Ok(true)
    }

    async fn duplicate_feature_value(
        &self,
        id: DbId,
        target_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Option<FeatureValue>> {
        let mut data = self.write();
        let Some(source) = data.values.get(&id).cloned() else {
            return Ok(None);
        };
        data.last_value_id += 1;
        let new_id = data.last_value_id;
        data.values.insert(
            new_id,
            ValueRecord {
                id_feature: target_feature,
                ..source
            },
        );
        Ok(data.feature_value(new_id, id_lang))
    }

    async fn list_feature_values(
        &self,
        id_feature: DbId,
        id_lang: LangId,
    ) -> CoreResult<Vec<FeatureValue>> {
        let data = self.read();
        Ok(data
            .values
            .iter()
            .filter(|(_, value)| value.id_feature == id_feature)
            .filter_map(|(&id, _)| data.feature_value(id, id_lang))
            .collect())
    }
}
