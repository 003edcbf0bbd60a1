use std::fmt::Display;

use crate::storage::StoreError;

/// Errors returned by the request orchestrators
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The referenced resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Precondition the caller can fix
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Store or lock failure
    #[error("Internal server error: {0}")]
    InternalServer(String),
}

impl ApiError {
    pub fn not_found(message: impl Display) -> Self {
        ApiError::NotFound(message.to_string())
    }

    pub fn invalid_request(message: impl Display) -> Self {
        ApiError::InvalidRequest(message.to_string())
    }

    pub fn internal(err: impl Display) -> Self {
        ApiError::InternalServer(err.to_string())
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ApiError::InternalServer(_))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::internal(err)
    }
}
