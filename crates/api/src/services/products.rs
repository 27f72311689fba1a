//! Product lookup and association moves between (feature, value) pairs.

use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::{FeaturePair, FeatureValueFilter};
use featmgr_core::ids::require_positive;
use featmgr_core::types::{DbId, LangId, ShopId};
use featmgr_db::models::product::{ProductQuery, ProductRow, TransferSummary};

use super::require_pair;
use crate::state::Catalog;

/// Products carrying `id_feature`, restricted to `value_ids` unless empty.
pub async fn get_products(
    catalog: &Catalog,
    id_feature: DbId,
    value_ids: Vec<DbId>,
    id_lang: LangId,
    id_shop: ShopId,
) -> CoreResult<Vec<ProductRow>> {
    let query = ProductQuery {
        id_feature: require_positive("id_feature", id_feature)?,
        filter: FeatureValueFilter::from_ids(value_ids),
        id_lang,
        id_shop,
    };
    catalog.products.products_by_feature_value(&query).await
}

/// Move products from one pair to another in a single transaction.
pub async fn relocate_products(
    catalog: &Catalog,
    from: FeaturePair,
    to: FeaturePair,
    product_ids: &[DbId],
) -> CoreResult<TransferSummary> {
    require_products(product_ids)?;
    from.ensure_distinct(to)?;
    require_pair(catalog, to).await?;
    catalog.associations.transfer(from, to, product_ids).await
}

/// Associate products with `to`. Returns the number of new rows.
pub async fn add_products(
    catalog: &Catalog,
    to: FeaturePair,
    product_ids: &[DbId],
) -> CoreResult<u64> {
    require_products(product_ids)?;
    require_pair(catalog, to).await?;
    catalog.associations.bulk_insert(to, product_ids).await
}

/// Remove the association of products with `from`. Returns the number of rows removed.
pub async fn delete_products(
    catalog: &Catalog,
    from: FeaturePair,
    product_ids: &[DbId],
) -> CoreResult<u64> {
    require_products(product_ids)?;
    catalog.associations.bulk_delete(from, product_ids).await
}

fn require_products(product_ids: &[DbId]) -> CoreResult<()> {
    if product_ids.is_empty() {
        return Err(CoreError::Validation(
            "id_products must contain at least one product id".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use featmgr_db::stores::{InMemoryCatalog, ProductSeed};

    use super::*;

    /// Feature 5 "Color" with values 11, 12, 13; feature 7 "Colour" with value 20.
    fn seeded() -> (Arc<InMemoryCatalog>, Catalog) {
        let store = Arc::new(InMemoryCatalog::new());
        store.insert_feature(5, &[(1, "Color")]);
        store.insert_feature(7, &[(1, "Colour")]);
        for (id, text) in [(11, "Red"), (12, "Green"), (13, "Blue")] {
            store.insert_feature_value(id, 5, &[(1, text)]);
        }
        store.insert_feature_value(20, 7, &[(1, "Teal")]);
        store.insert_category(3, 1, "Shirts");
        for id in 101..=106 {
            store.insert_product(ProductSeed::simple(id, 1, &format!("Product {id}"), 1, 3));
        }
        let catalog = Catalog::in_memory(store.clone());
        (store, catalog)
    }

    fn pair(id_feature: DbId, id_feature_value: DbId) -> FeaturePair {
        FeaturePair::new(id_feature, id_feature_value).unwrap()
    }

    fn product_ids(rows: &[ProductRow]) -> Vec<DbId> {
        rows.iter().map(|r| r.id_product).collect()
    }

    #[tokio::test]
    async fn empty_value_filter_returns_union_of_all_values() {
        let (store, catalog) = seeded();
        store.associate(5, 11, &[101, 102]);
        store.associate(5, 12, &[103]);
        store.associate(5, 13, &[104, 105]);

        let rows = get_products(&catalog, 5, vec![], 1, 1).await.unwrap();
        assert_eq!(product_ids(&rows), vec![101, 102, 103, 104, 105]);

        let rows = get_products(&catalog, 5, vec![13], 1, 1).await.unwrap();
        assert_eq!(product_ids(&rows), vec![104, 105]);
    }

    #[tokio::test]
    async fn relocate_scenario_moves_rows_between_pairs() {
        let (store, catalog) = seeded();
        store.insert_feature_value(21, 7, &[(1, "Navy")]);
        store.associate(5, 12, &[101, 102]);

        let summary = relocate_products(&catalog, pair(5, 12), pair(7, 21), &[101, 102])
            .await
            .unwrap();
        assert_eq!(summary, TransferSummary { inserted: 2, deleted: 2 });

        let moved = get_products(&catalog, 7, vec![21], 1, 1).await.unwrap();
        assert_eq!(product_ids(&moved), vec![101, 102]);
        assert!(get_products(&catalog, 5, vec![12], 1, 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn target_value_must_belong_to_target_feature() {
        let (store, catalog) = seeded();
        store.associate(5, 12, &[101]);

        assert_matches!(
            relocate_products(&catalog, pair(5, 12), pair(7, 11), &[101]).await,
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            add_products(&catalog, pair(7, 99), &[101]).await,
            Err(CoreError::NotFound { entity: "Feature value", id: 99 })
        );
        assert_eq!(store.associations().len(), 1);
    }

    #[tokio::test]
    async fn add_and_delete_report_row_counts() {
        let (store, catalog) = seeded();
        store.associate(7, 20, &[101]);

        assert_eq!(add_products(&catalog, pair(7, 20), &[101, 102]).await.unwrap(), 1);
        assert_eq!(
            delete_products(&catalog, pair(7, 20), &[101, 102, 103]).await.unwrap(),
            2
        );
        assert!(store.associations().is_empty());
    }

    #[tokio::test]
    async fn empty_product_list_is_rejected() {
        let (_, catalog) = seeded();
        assert_matches!(
            delete_products(&catalog, pair(5, 11), &[]).await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            relocate_products(&catalog, pair(5, 11), pair(5, 11), &[101]).await,
            Err(CoreError::Validation(_))
        );
    }
}
