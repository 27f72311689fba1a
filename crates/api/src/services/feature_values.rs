//! Feature value creation, deletion, duplication and relocation.

use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::EntityKind;
use featmgr_core::ids::require_positive;
use featmgr_core::types::{DbId, LangId};
use featmgr_db::models::feature::{CreateFeatureValue, FeatureValue};
use serde::Serialize;

use super::{require_feature, require_feature_value};
use crate::state::Catalog;

/// Outcome of moving a value to another feature.
#[derive(Debug, Clone, Serialize)]
pub struct RelocatedValue {
    pub feature_value: FeatureValue,
    pub old_id_feature: DbId,
    /// Products whose association moved with the value.
    pub id_products: Vec<DbId>,
}

pub async fn create_feature_value(
    catalog: &Catalog,
    id_feature: DbId,
    value: &str,
    custom: bool,
    id_lang: LangId,
) -> CoreResult<FeatureValue> {
    let id_feature = require_positive("id_feature", id_feature)?;
    require_feature(catalog, id_feature, id_lang).await?;

    let input = CreateFeatureValue {
        id_feature,
        value: value.trim().to_string(),
        custom,
        id_lang,
    };
    catalog.entities.create_feature_value(&input).await
}

pub async fn list_feature_values(
    catalog: &Catalog,
    id_feature: DbId,
    id_lang: LangId,
) -> CoreResult<Vec<FeatureValue>> {
    let id_feature = require_positive("id_feature", id_feature)?;
    require_feature(catalog, id_feature, id_lang).await?;
    catalog
        .entities
        .list_feature_values(id_feature, id_lang)
        .await
}

pub async fn delete_feature_value(catalog: &Catalog, id_feature_value: DbId) -> CoreResult<()> {
    let id_feature_value = require_positive("id_feature_value", id_feature_value)?;
    require_feature_value(catalog, id_feature_value, 0).await?;

    if !catalog
        .entities
        .delete(EntityKind::FeatureValue, id_feature_value)
        .await?
    {
        return Err(CoreError::Persistence(format!(
            "Feature value #{id_feature_value} could not be deleted"
        )));
    }
    Ok(())
}

/// Copy a value, with all of its translations, under `target_feature`.
pub async fn duplicate_feature_value(
    catalog: &Catalog,
    id_feature_value: DbId,
    target_feature: DbId,
    id_lang: LangId,
) -> CoreResult<FeatureValue> {
    let id_feature_value = require_positive("id_feature_value", id_feature_value)?;
    let target_feature = require_positive("id_feature", target_feature)?;
    require_feature(catalog, target_feature, id_lang).await?;

    catalog
        .entities
        .duplicate_feature_value(id_feature_value, target_feature, id_lang)
        .await?
        .ok_or(CoreError::NotFound {
            entity: EntityKind::FeatureValue.label(),
            id: id_feature_value,
        })
}

/// Re-parent a value from `id_feature` to `new_id_feature`, carrying its
/// product associations along.
pub async fn relocate_feature_value(
    catalog: &Catalog,
    id_feature_value: DbId,
    id_feature: DbId,
    new_id_feature: DbId,
    id_lang: LangId,
) -> CoreResult<RelocatedValue> {
    let id_feature_value = require_positive("id_feature_value", id_feature_value)?;
    let id_feature = require_positive("id_feature", id_feature)?;
    let new_id_feature = require_positive("new_id_feature", new_id_feature)?;
    if id_feature == new_id_feature {
        return Err(CoreError::Validation(
            "new_id_feature must differ from id_feature".into(),
        ));
    }

    let current = require_feature_value(catalog, id_feature_value, id_lang).await?;
    if current.id_feature != id_feature {
        return Err(CoreError::Conflict("Feature ID incorrect".into()));
    }
    require_feature(catalog, new_id_feature, id_lang).await?;

    let id_products = catalog
        .associations
        .relocate_value(id_feature_value, id_feature, new_id_feature)
        .await?;

    let feature_value = require_feature_value(catalog, id_feature_value, id_lang).await?;
    Ok(RelocatedValue {
        feature_value,
        old_id_feature: id_feature,
        id_products,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use featmgr_core::feature::FeaturePair;
    use featmgr_db::stores::InMemoryCatalog;

    use super::*;

    fn seeded() -> (Arc<InMemoryCatalog>, Catalog) {
        let store = Arc::new(InMemoryCatalog::new());
        store.insert_feature(5, &[(1, "Color")]);
        store.insert_feature(7, &[(1, "Colour")]);
        store.insert_feature_value(12, 5, &[(1, "Red"), (2, "Rouge")]);
        store.associate(5, 12, &[101, 102]);
        let catalog = Catalog::in_memory(store.clone());
        (store, catalog)
    }

    #[tokio::test]
    async fn create_requires_existing_feature() {
        let (_, catalog) = seeded();
        assert_matches!(
            create_feature_value(&catalog, 99, "Green", false, 1).await,
            Err(CoreError::NotFound { entity: "Feature", id: 99 })
        );

        let value = create_feature_value(&catalog, 5, " Green ", true, 1)
            .await
            .unwrap();
        assert_eq!(value.value.as_deref(), Some("Green"));
        assert!(value.custom);
    }

    #[tokio::test]
    async fn relocate_moves_value_and_products() {
        let (_, catalog) = seeded();

        let relocated = relocate_feature_value(&catalog, 12, 5, 7, 1).await.unwrap();
        assert_eq!(relocated.feature_value.id_feature, 7);
        assert_eq!(relocated.old_id_feature, 5);
        assert_eq!(relocated.id_products, vec![101, 102]);

        let to = FeaturePair::new(7, 12).unwrap();
        assert_eq!(
            catalog.associations.product_ids(to).await.unwrap(),
            vec![101, 102]
        );
    }

    #[tokio::test]
    async fn relocate_rejects_wrong_current_feature() {
        let (_, catalog) = seeded();
        assert_matches!(
            relocate_feature_value(&catalog, 12, 7, 5, 1).await,
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            relocate_feature_value(&catalog, 12, 5, 5, 1).await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            relocate_feature_value(&catalog, 12, 5, 40, 1).await,
            Err(CoreError::NotFound { entity: "Feature", id: 40 })
        );
    }

    #[tokio::test]
    async fn duplicate_keeps_original_and_copies_translations() {
        let (_, catalog) = seeded();

        let copy = duplicate_feature_value(&catalog, 12, 7, 2).await.unwrap();
        assert_eq!(copy.id_feature, 7);
        assert_eq!(copy.value.as_deref(), Some("Rouge"));

        let original = require_feature_value(&catalog, 12, 1).await.unwrap();
        assert_eq!(original.id_feature, 5);
        assert_matches!(
            duplicate_feature_value(&catalog, 404, 7, 1).await,
            Err(CoreError::NotFound { entity: "Feature value", id: 404 })
        );
    }

    #[tokio::test]
    async fn delete_value_drops_its_associations() {
        let (store, catalog) = seeded();
        delete_feature_value(&catalog, 12).await.unwrap();
        assert!(store.associations().is_empty());
        assert_matches!(
            delete_feature_value(&catalog, 12).await,
            Err(CoreError::NotFound { .. })
        );
    }
}
