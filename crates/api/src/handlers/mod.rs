pub mod feature_values;
pub mod features;
pub mod orphans;
pub mod products;
