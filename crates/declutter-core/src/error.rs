//! Domain Errors
//!
//! Every failure in the core is locally recoverable and ends up as
//! user-visible state (a failed queue item, a toast, an inline message).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not authenticated")]
    Unauthenticated,
    /// Rejection from the hosted backend or the JS bridge
    #[error("{0}")]
    Backend(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Message shown to the user, without the variant prefix for backend failures.
    pub fn user_message(&self) -> String {
        match self {
            DomainError::Backend(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<image::ImageError> for DomainError {
    fn from(err: image::ImageError) -> Self {
        DomainError::InvalidInput(format!("image: {}", err))
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Internal(format!("json: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_passed_through() {
        let err = DomainError::Backend("Network error".to_string());
        assert_eq!(err.user_message(), "Network error");
        assert_eq!(err.to_string(), "Network error");
    }

    #[test]
    fn test_prefixed_messages() {
        assert_eq!(DomainError::NotFound("item-1".into()).to_string(), "Not found: item-1");
        assert_eq!(DomainError::Unauthenticated.user_message(), "Not authenticated");
    }
}
