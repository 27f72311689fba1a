//! Feature / feature value addressing shared by the stores and services.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::require_positive;
use crate::types::DbId;

/// The two entity kinds the manager can create, delete and clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Feature,
    FeatureValue,
}

impl EntityKind {
    /// Human-readable name used in messages and `NotFound` errors.
    pub fn label(self) -> &'static str {
        match self {
            Self::Feature => "Feature",
            Self::FeatureValue => "Feature value",
        }
    }
}

/// One side of an association: a feature together with one of its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeaturePair {
    pub id_feature: DbId,
    pub id_feature_value: DbId,
}

impl FeaturePair {
    /// Build a pair, rejecting non-positive IDs.
    pub fn new(id_feature: DbId, id_feature_value: DbId) -> Result<Self, CoreError> {
        Ok(Self {
            id_feature: require_positive("id_feature", id_feature)?,
            id_feature_value: require_positive("id_feature_value", id_feature_value)?,
        })
    }

    /// Same as [`FeaturePair::new`] but for the target side of a move.
    pub fn new_target(id_feature: DbId, id_feature_value: DbId) -> Result<Self, CoreError> {
        Ok(Self {
            id_feature: require_positive("new_id_feature", id_feature)?,
            id_feature_value: require_positive("new_id_feature_value", id_feature_value)?,
        })
    }

    /// A transfer onto itself would insert nothing and then delete every row.
    pub fn ensure_distinct(self, target: FeaturePair) -> Result<(), CoreError> {
        if self == target {
            return Err(CoreError::Validation(format!(
                "source and target pair are identical (feature {}, value {})",
                self.id_feature, self.id_feature_value
            )));
        }
        Ok(())
    }
}

/// Restriction on feature values applied by the product lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeatureValueFilter {
    /// Every value of the feature.
    #[default]
    Any,
    One(DbId),
    Many(Vec<DbId>),
}

impl FeatureValueFilter {
    /// Pick the narrowest filter for an already-filtered ID list.
    pub fn from_ids(ids: Vec<DbId>) -> Self {
        match ids.as_slice() {
            [] => Self::Any,
            [single] => Self::One(*single),
            _ => Self::Many(ids),
        }
    }

    pub fn matches(&self, id_feature_value: DbId) -> bool {
        match self {
            Self::Any => true,
            Self::One(id) => *id == id_feature_value,
            Self::Many(ids) => ids.contains(&id_feature_value),
        }
    }

    /// The value IDs to bind in an `= ANY(...)` clause, `None` for no restriction.
    pub fn ids(&self) -> Option<Vec<DbId>> {
        match self {
            Self::Any => None,
            Self::One(id) => Some(vec![*id]),
            Self::Many(ids) => Some(ids.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pair_rejects_non_positive_ids() {
        assert_matches!(
            FeaturePair::new(0, 3),
            Err(CoreError::InvalidId {
                field: "id_feature",
                ..
            })
        );
        assert_matches!(
            FeaturePair::new_target(2, -1),
            Err(CoreError::InvalidId {
                field: "new_id_feature_value",
                ..
            })
        );
    }

    #[test]
    fn identical_pairs_cannot_be_transferred() {
        let pair = FeaturePair::new(5, 12).unwrap();
        assert_matches!(pair.ensure_distinct(pair), Err(CoreError::Validation(_)));
        assert!(pair
            .ensure_distinct(FeaturePair::new(7, 12).unwrap())
            .is_ok());
    }

    #[test]
    fn filter_from_ids_picks_narrowest_variant() {
        assert_eq!(FeatureValueFilter::from_ids(vec![]), FeatureValueFilter::Any);
        assert_eq!(FeatureValueFilter::from_ids(vec![4]), FeatureValueFilter::One(4));
        assert_eq!(
            FeatureValueFilter::from_ids(vec![4, 9]),
            FeatureValueFilter::Many(vec![4, 9])
        );
    }

    #[test]
    fn filter_matching() {
        assert!(FeatureValueFilter::Any.matches(77));
        assert!(!FeatureValueFilter::One(3).matches(4));
        assert!(FeatureValueFilter::Many(vec![1, 2]).matches(2));
        assert_eq!(FeatureValueFilter::Any.ids(), None);
        assert_eq!(FeatureValueFilter::One(3).ids(), Some(vec![3]));
    }

    #[test]
    fn entity_kind_labels() {
        assert_eq!(EntityKind::Feature.label(), "Feature");
        assert_eq!(EntityKind::FeatureValue.label(), "Feature value");
    }
}
