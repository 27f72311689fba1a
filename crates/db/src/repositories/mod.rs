//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` and the resolved [`Tables`](crate::tables::Tables).

pub mod association_repo;
pub mod feature_repo;
pub mod feature_value_repo;
pub mod orphan_repo;
pub mod product_repo;

pub use association_repo::AssociationRepo;
pub use feature_repo::FeatureRepo;
pub use feature_value_repo::FeatureValueRepo;
pub use orphan_repo::OrphanRepo;
pub use product_repo::ProductRepo;
