//! Feature creation, listing and deletion.

use featmgr_core::error::{CoreError, CoreResult};
use featmgr_core::feature::EntityKind;
use featmgr_core::ids::require_positive;
use featmgr_core::types::{DbId, LangId};
use featmgr_db::models::feature::{CreateFeature, Feature};

use super::require_feature;
use crate::state::Catalog;

/// Create a feature named `name` in `id_lang`. Surrounding whitespace is trimmed.
pub async fn create_feature(catalog: &Catalog, name: &str, id_lang: LangId) -> CoreResult<Feature> {
    let input = CreateFeature {
        name: name.trim().to_string(),
        id_lang,
    };
    catalog.entities.create_feature(&input).await
}

pub async fn list_features(catalog: &Catalog, id_lang: LangId) -> CoreResult<Vec<Feature>> {
    catalog.entities.list_features(id_lang).await
}

/// Delete a feature with its values and associations.
pub async fn delete_feature(catalog: &Catalog, id_feature: DbId) -> CoreResult<()> {
    let id_feature = require_positive("id_feature", id_feature)?;
    require_feature(catalog, id_feature, 0).await?;

    if !catalog.entities.delete(EntityKind::Feature, id_feature).await? {
        return Err(CoreError::Persistence(format!(
            "Feature #{id_feature} could not be deleted"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use featmgr_db::stores::InMemoryCatalog;

    use super::*;

    fn catalog() -> (Arc<InMemoryCatalog>, Catalog) {
        let store = Arc::new(InMemoryCatalog::new());
        let catalog = Catalog::in_memory(store.clone());
        (store, catalog)
    }

    #[tokio::test]
    async fn create_trims_and_lists_feature() {
        let (_, catalog) = catalog();
        let created = create_feature(&catalog, "  Color ", 1).await.unwrap();
        assert_eq!(created.name.as_deref(), Some("Color"));

        let listed = list_features(&catalog, 1).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (_, catalog) = catalog();
        assert_matches!(
            create_feature(&catalog, "   ", 1).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn delete_reports_missing_and_refused() {
        let (store, catalog) = catalog();
        store.insert_feature(4, &[(1, "Size")]);

        assert_matches!(
            delete_feature(&catalog, 9).await,
            Err(CoreError::NotFound { id: 9, .. })
        );
        assert_matches!(
            delete_feature(&catalog, 0).await,
            Err(CoreError::InvalidId { .. })
        );

        store.refuse_delete(EntityKind::Feature, 4);
        assert_matches!(
            delete_feature(&catalog, 4).await,
            Err(CoreError::Persistence(_))
        );
    }

    #[tokio::test]
    async fn delete_removes_feature() {
        let (store, catalog) = catalog();
        store.insert_feature(4, &[(1, "Size")]);

        delete_feature(&catalog, 4).await.unwrap();
        assert!(list_features(&catalog, 1).await.unwrap().is_empty());
    }
}
