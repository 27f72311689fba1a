pub mod feature;
pub mod product;
