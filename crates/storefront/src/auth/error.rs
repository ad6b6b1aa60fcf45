//! Authentication error types.

use thiserror::Error;

use crate::error::ApiError;
use crate::storage::StorageError;

/// Errors from login, registration, and profile operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shopfront_core::EmailError),

    /// A required registration field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The server answered but the payload lacked the user or tokens.
    #[error("authentication response was incomplete")]
    IncompleteResponse,

    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Tokens could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Text for a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
