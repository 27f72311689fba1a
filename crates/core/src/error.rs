use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: #{id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid {field}: {value}. Id must be a number greater than zero")]
    InvalidId { field: &'static str, value: DbId },

    #[error("Product id {0} is invalid. Product id must be a number greater than zero")]
    InvalidProductId(DbId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for errors caused by client input rather than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Validation(_)
                | Self::InvalidId { .. }
                | Self::InvalidProductId(_)
                | Self::Conflict(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
