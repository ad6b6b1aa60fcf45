//! Unified error handling for admin views.

use thiserror::Error;

use shopfront_core::Role;
use shopfront_storefront::error::ApiError;

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No user is signed in.
    #[error("Unauthorized: sign in to continue")]
    Unauthorized,

    /// The signed-in user is not an admin.
    #[error("Forbidden: {role} accounts cannot open admin views")]
    Forbidden { role: Role },

    /// Record is not in the loaded list.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Another inline edit of the same record has not settled yet.
    #[error("An edit to {0} is already in progress")]
    EditInProgress(String),

    /// Remote call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminError {
    /// Text for a blocking notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result alias for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
