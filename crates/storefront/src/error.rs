//! Client error taxonomy.
//!
//! Every remote call returns `Result<T, ApiError>`. The variants follow how a
//! failure should be surfaced:
//!
//! - transport failures and 5xx get a generic message;
//! - 4xx rejections carry the server's envelope message;
//! - 401s are either recovered by the refresh path or end the session.

use thiserror::Error;

use crate::http::TransportError;
use crate::storage::StorageError;

/// Message shown for failures the user can't act on.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors from the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No HTTP status was received (network, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered 401 and the refresh path did not recover it.
    #[error("unauthorized{}", fmt_message(.message))]
    Unauthorized { message: Option<String> },

    /// Token refresh failed; stored credentials were cleared.
    #[error("session expired, please sign in again")]
    SessionExpired,

    /// The server rejected the request (4xx other than 401).
    #[error("request rejected ({status}){}", fmt_message(.message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The server failed (5xx or an unexpected status).
    #[error("server error ({status}){}", fmt_message(.message))]
    Server {
        status: u16,
        message: Option<String>,
    },

    /// A 2xx body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx envelope had no `data` where one was required.
    #[error("response from {0} has no data")]
    MissingData(String),

    /// Durable storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

fn fmt_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map_or_else(String::new, |m| format!(": {m}"))
}

impl ApiError {
    /// Text for a blocking notification.
    ///
    /// Rejections show the server's message; everything else is generic.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            }
            | Self::Unauthorized {
                message: Some(message),
            } => message.clone(),
            Self::Unauthorized { message: None } | Self::SessionExpired => {
                "Please sign in again.".to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// HTTP status, when the server produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error means the user must authenticate again.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::SessionExpired)
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = ApiError::Rejected {
            status: 422,
            message: Some("Invalid quantity".to_string()),
        };
        assert_eq!(err.to_string(), "request rejected (422): Invalid quantity");

        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "server error (500)");
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = ApiError::Server {
            status: 500,
            message: Some("NullPointerException at line 42".to_string()),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);

        let err = ApiError::Transport(TransportError::Timeout);
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_requires_login() {
        assert!(ApiError::SessionExpired.requires_login());
        assert!(ApiError::Unauthorized { message: None }.requires_login());
        assert!(
            !ApiError::Rejected {
                status: 403,
                message: None
            }
            .requires_login()
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(ApiError::SessionExpired.status(), None);
        assert_eq!(
            ApiError::Rejected {
                status: 404,
                message: None
            }
            .status(),
            Some(404)
        );
    }
}
