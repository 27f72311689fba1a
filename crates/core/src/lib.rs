//! Domain rules for the feature manager: identifiers, feature/value pairs,
//! bulk delete reporting and the shared error type.
//!
//! Nothing in this crate touches the database.

pub mod bulk;
pub mod error;
pub mod feature;
pub mod ids;
pub mod types;
