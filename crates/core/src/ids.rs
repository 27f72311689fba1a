//! Identifier parsing and validation.
//!
//! Client-submitted ID lists arrive either as a comma-separated string
//! (`"101,102,abc,-3"`) or as a JSON array. Lists coming from the client are
//! *filtered*: non-numeric and non-positive entries are dropped silently.
//! Lists handed to the association store are *validated*: a single
//! non-positive ID rejects the whole list before any mutation.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Parse a comma-separated ID list, keeping positive integers only.
///
/// Order of first occurrence is preserved and duplicates are collapsed.
pub fn parse_id_list(raw: &str) -> Vec<DbId> {
    dedup_positive(raw.split(',').filter_map(|part| part.trim().parse::<DbId>().ok()))
}

/// Keep positive IDs in first-seen order, dropping repeats.
pub fn dedup_positive(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|&id| id > 0 && seen.insert(id))
        .collect()
}

/// Reject the whole list if any product ID is zero or negative.
pub fn validate_product_ids(ids: &[DbId]) -> Result<(), CoreError> {
    match ids.iter().find(|&&id| id <= 0) {
        Some(&bad) => Err(CoreError::InvalidProductId(bad)),
        None => Ok(()),
    }
}

/// Require a single named identifier to be positive.
pub fn require_positive(field: &'static str, value: DbId) -> Result<DbId, CoreError> {
    if value <= 0 {
        return Err(CoreError::InvalidId { field, value });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// IdList
// ---------------------------------------------------------------------------

/// A filtered list of positive IDs, deserialized from a comma-separated
/// string or from an array of numbers/strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdList(Vec<DbId>);

impl IdList {
    pub fn new(ids: impl IntoIterator<Item = DbId>) -> Self {
        Self(dedup_positive(ids))
    }

    pub fn as_slice(&self) -> &[DbId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<DbId> {
        self.0
    }
}

impl From<&str> for IdList {
    fn from(raw: &str) -> Self {
        Self(parse_id_list(raw))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(DbId),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdList {
    Text(String),
    Items(Vec<RawId>),
}

impl<'de> Deserialize<'de> for IdList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = match RawIdList::deserialize(deserializer)? {
            RawIdList::Text(raw) => parse_id_list(&raw),
            RawIdList::Items(items) => dedup_positive(items.into_iter().filter_map(|item| {
                match item {
                    RawId::Number(id) => Some(id),
                    RawId::Text(text) => text.trim().parse().ok(),
                }
            })),
        };
        Ok(Self(ids))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_drops_invalid_and_non_positive_entries() {
        assert_eq!(parse_id_list("3, 0,abc,-7,5,,12"), vec![3, 5, 12]);
    }

    #[test]
    fn parse_empty_string_yields_nothing() {
        assert!(parse_id_list("").is_empty());
        assert!(parse_id_list(" , ,").is_empty());
    }

    #[test]
    fn parse_collapses_duplicates_keeping_first_position() {
        assert_eq!(parse_id_list("9,4,9,4,1"), vec![9, 4, 1]);
    }

    #[test]
    fn validate_accepts_positive_ids() {
        assert!(validate_product_ids(&[1, 2, 3]).is_ok());
        assert!(validate_product_ids(&[]).is_ok());
    }

    #[test]
    fn validate_reports_first_bad_id() {
        assert_matches!(
            validate_product_ids(&[4, -2, 0]),
            Err(CoreError::InvalidProductId(-2))
        );
    }

    #[test]
    fn require_positive_names_the_field() {
        assert_matches!(
            require_positive("id_feature", 0),
            Err(CoreError::InvalidId {
                field: "id_feature",
                value: 0
            })
        );
        assert_eq!(require_positive("id_feature", 8).unwrap(), 8);
    }

    #[test]
    fn id_list_deserializes_from_comma_string() {
        let list: IdList = serde_json::from_str(r#""101, 102,x,0""#).unwrap();
        assert_eq!(list.as_slice(), &[101, 102]);
    }

    #[test]
    fn id_list_deserializes_from_mixed_array() {
        let list: IdList = serde_json::from_str(r#"[7, "8", -1, "nope", 7]"#).unwrap();
        assert_eq!(list.as_slice(), &[7, 8]);
    }

    #[test]
    fn id_list_serializes_as_plain_array() {
        let list = IdList::new([3, 1]);
        assert_eq!(serde_json::to_string(&list).unwrap(), "[3,1]");
    }
}
