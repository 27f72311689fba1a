/// Catalog primary keys are unsigned in the shop schema but always fit an `i64`.
pub type DbId = i64;

/// Language identifier (`id_lang`).
pub type LangId = DbId;

/// Shop identifier (`id_shop`).
pub type ShopId = DbId;
