use thiserror::Error;

use crate::database::DatabaseError;

/// Domain-level failures. Messages are safe to show to clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Log a store failure with its context and hide it behind a generic message
    pub fn store(action: &str, err: DatabaseError) -> Self {
        tracing::error!("Error trying to {}: {}", action, err);
        ServiceError::Internal(format!("Failed to {}", action))
    }
}
