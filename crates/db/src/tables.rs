//! Prefixed table names for the shop catalog schema.
//!
//! The prefix is validated once when the [`Tables`] value is built and the
//! resulting names are reused for every query. Values are always bound as
//! parameters; only these identifiers are interpolated into SQL text.

use featmgr_core::error::CoreError;

/// Prefix used by a stock shop installation and by `db/migrations`.
pub const DEFAULT_TABLE_PREFIX: &str = "ps_";

/// Maximum prefix length, leaving room for the longest table suffix
/// within PostgreSQL's 63-byte identifier limit.
const MAX_PREFIX_LEN: usize = 32;

/// Fully-qualified table names for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub prefix: String,
    pub product: String,
    pub product_lang: String,
    pub product_shop: String,
    pub feature: String,
    pub feature_lang: String,
    pub feature_value: String,
    pub feature_value_lang: String,
    pub feature_product: String,
    pub category_lang: String,
    pub supplier: String,
    pub manufacturer: String,
}

impl Tables {
    /// Resolve table names for `prefix`.
    ///
    /// The prefix may be empty; otherwise it must start with an ASCII letter
    /// or underscore and contain only ASCII alphanumerics and underscores.
    pub fn new(prefix: &str) -> Result<Self, CoreError> {
        validate_prefix(prefix)?;
        Ok(Self::with_prefix(prefix))
    }

    fn with_prefix(prefix: &str) -> Self {
        let name = |table: &str| format!("{prefix}{table}");

        Self {
            prefix: prefix.to_string(),
            product: name("product"),
            product_lang: name("product_lang"),
            product_shop: name("product_shop"),
            feature: name("feature"),
            feature_lang: name("feature_lang"),
            feature_value: name("feature_value"),
            feature_value_lang: name("feature_value_lang"),
            feature_product: name("feature_product"),
            category_lang: name("category_lang"),
            supplier: name("supplier"),
            manufacturer: name("manufacturer"),
        }
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_TABLE_PREFIX)
    }
}

fn validate_prefix(prefix: &str) -> Result<(), CoreError> {
    if prefix.len() > MAX_PREFIX_LEN {
        return Err(CoreError::Validation(format!(
            "table prefix must be at most {MAX_PREFIX_LEN} characters"
        )));
    }
    let mut chars = prefix.chars();
    let starts_ok = chars
        .next()
        .map_or(true, |c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !(starts_ok && rest_ok) {
        return Err(CoreError::Validation(format!(
            "table prefix '{prefix}' may only contain ASCII letters, digits and '_'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_prefix_names_tables() {
        let tables = Tables::default();
        assert_eq!(tables.feature_product, "ps_feature_product");
        assert_eq!(tables.category_lang, "ps_category_lang");
    }

    #[test]
    fn empty_prefix_is_allowed() {
        let tables = Tables::new("").unwrap();
        assert_eq!(tables.product, "product");
    }

    #[test]
    fn rejects_injection_attempts() {
        assert_matches!(Tables::new("ps_; DROP"), Err(CoreError::Validation(_)));
        assert_matches!(Tables::new("shop-"), Err(CoreError::Validation(_)));
        assert_matches!(Tables::new("1ps_"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_overlong_prefix() {
        let prefix = "p".repeat(MAX_PREFIX_LEN + 1);
        assert_matches!(Tables::new(&prefix), Err(CoreError::Validation(_)));
    }
}
