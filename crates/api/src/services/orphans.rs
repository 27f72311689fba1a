//! Listing and cleanup of features and values that no product references.

use featmgr_core::bulk::{BulkDeleteReport, DeleteOutcome};
use featmgr_core::error::CoreResult;
use featmgr_core::feature::EntityKind;
use featmgr_core::types::{DbId, LangId};
use featmgr_db::models::feature::{Feature, FeatureValue};

use crate::state::Catalog;

pub async fn list_orphan_features(catalog: &Catalog, id_lang: LangId) -> CoreResult<Vec<Feature>> {
    catalog.orphans.orphan_features(id_lang).await
}

pub async fn list_orphan_feature_values(
    catalog: &Catalog,
    id_lang: LangId,
) -> CoreResult<Vec<FeatureValue>> {
    catalog.orphans.orphan_feature_values(id_lang).await
}

/// Delete each entity in `ids` independently.
///
/// `ids` is expected to be filtered already (positive, deduplicated). Missing
/// entities are skipped; a failed delete is recorded and the loop goes on.
/// Nothing deleted earlier is rolled back.
pub async fn bulk_delete_orphans(
    catalog: &Catalog,
    kind: EntityKind,
    ids: &[DbId],
) -> BulkDeleteReport {
    let mut report = BulkDeleteReport::default();

    for &id in ids {
        let outcome = match catalog.entities.exists(kind, id).await {
            Ok(false) => DeleteOutcome::Skipped,
            Ok(true) => match catalog.entities.delete(kind, id).await {
                Ok(true) => DeleteOutcome::Deleted,
                Ok(false) => DeleteOutcome::Failed {
                    reason: format!("{} #{id} could not be deleted", kind.label()),
                },
                Err(err) => DeleteOutcome::Failed {
                    reason: err.to_string(),
                },
            },
            Err(err) => DeleteOutcome::Failed {
                reason: err.to_string(),
            },
        };

        if let DeleteOutcome::Failed { reason } = &outcome {
            tracing::warn!(kind = kind.label(), id, %reason, "Orphan delete failed");
        }
        report.record(id, outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use featmgr_core::ids::parse_id_list;
    use featmgr_db::stores::InMemoryCatalog;

    use super::*;

    fn seeded() -> (Arc<InMemoryCatalog>, Catalog) {
        let store = Arc::new(InMemoryCatalog::new());
        store.insert_feature(1, &[(1, "Used")]);
        store.insert_feature(2, &[(1, "Unused")]);
        store.insert_feature(3, &[(1, "Locked")]);
        store.insert_feature_value(10, 1, &[(1, "In use")]);
        store.insert_feature_value(11, 1, &[(1, "Spare")]);
        store.associate(1, 10, &[500]);
        let catalog = Catalog::in_memory(store.clone());
        (store, catalog)
    }

    #[tokio::test]
    async fn orphan_lists_follow_associations() {
        let (store, catalog) = seeded();

        let features = list_orphan_features(&catalog, 1).await.unwrap();
        assert_eq!(
            features.iter().map(|f| f.id_feature).collect::<Vec<_>>(),
            vec![2, 3]
        );

        store.associate(2, 11, &[501]);
        let features = list_orphan_features(&catalog, 1).await.unwrap();
        assert_eq!(
            features.iter().map(|f| f.id_feature).collect::<Vec<_>>(),
            vec![3]
        );
        assert!(list_orphan_feature_values(&catalog, 1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn mixed_id_list_reports_each_outcome() {
        let (store, catalog) = seeded();
        store.refuse_delete(EntityKind::Feature, 3);

        let ids = parse_id_list("2,abc,-1,0,404,3");
        assert_eq!(ids, vec![2, 404, 3]);

        let report = bulk_delete_orphans(&catalog, EntityKind::Feature, &ids).await;
        assert_eq!(report.deleted_ids(), vec![2]);
        assert_eq!(report.skipped_ids(), vec![404]);
        assert_eq!(report.failed_ids(), vec![3]);
        assert!(!report.all_succeeded());

        assert!(!catalog.entities.exists(EntityKind::Feature, 2).await.unwrap());
    }

    #[tokio::test]
    async fn nonexistent_ids_alone_still_succeed() {
        let (_, catalog) = seeded();
        let report = bulk_delete_orphans(&catalog, EntityKind::FeatureValue, &[77, 78]).await;
        assert!(report.all_succeeded());
        assert!(report.deleted_ids().is_empty());
    }
}
