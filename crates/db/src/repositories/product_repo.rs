//! Read-only product lookup joined across the catalog tables.

use sqlx::PgPool;

use crate::models::product::{ProductQuery, ProductRow};
use crate::tables::Tables;

/// Resolves which products carry a feature value, with display metadata.
pub struct ProductRepo;

impl ProductRepo {
    /// Products associated with `query.id_feature`, scoped to one language
    /// and one shop, optionally restricted to some feature values.
    ///
    /// Supplier and manufacturer are optional; product, category, feature
    /// and value translations must exist in the requested language.
    pub async fn by_feature_value(
        pool: &PgPool,
        tables: &Tables,
        query: &ProductQuery,
    ) -> Result<Vec<ProductRow>, sqlx::Error> {
        let sql = format!(
            "SELECT p.id_product, p.id_supplier, s.name AS supplier, \
                    p.id_manufacturer, m.name AS manufacturer, p.reference, p.active, \
                    pl.id_lang, pl.name, ps.id_shop, ps.id_category_default, cl.name AS category, \
                    fp.id_feature, fl.name AS feature, fp.id_feature_value, fvl.value \
             FROM {product} p \
             INNER JOIN {product_lang} pl ON (pl.id_product = p.id_product AND pl.id_lang = $2) \
             INNER JOIN {product_shop} ps ON (ps.id_product = p.id_product AND ps.id_shop = $3) \
             INNER JOIN {feature_product} fp ON (fp.id_product = p.id_product) \
             INNER JOIN {feature_lang} fl ON (fl.id_feature = fp.id_feature AND fl.id_lang = $2) \
             INNER JOIN {feature_value_lang} fvl \
                 ON (fvl.id_feature_value = fp.id_feature_value AND fvl.id_lang = $2) \
             INNER JOIN {category_lang} cl \
                 ON (cl.id_category = ps.id_category_default AND cl.id_lang = $2) \
             LEFT JOIN {supplier} s ON (s.id_supplier = p.id_supplier) \
             LEFT JOIN {manufacturer} m ON (m.id_manufacturer = p.id_manufacturer) \
             WHERE fp.id_feature = $1 \
               AND ($4::BIGINT[] IS NULL OR fp.id_feature_value = ANY($4)) \
             ORDER BY p.id_product, fp.id_feature_value",
            product = tables.product,
            product_lang = tables.product_lang,
            product_shop = tables.product_shop,
            feature_product = tables.feature_product,
            feature_lang = tables.feature_lang,
            feature_value_lang = tables.feature_value_lang,
            category_lang = tables.category_lang,
            supplier = tables.supplier,
            manufacturer = tables.manufacturer,
        );

        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(query.id_feature)
            .bind(query.id_lang)
            .bind(query.id_shop)
            .bind(query.filter.ids())
            .fetch_all(pool)
            .await
    }
}
