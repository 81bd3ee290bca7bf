//! Error types for the walletdesk core library.

use std::fmt;

use thiserror::Error;

/// Result type alias using walletdesk Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for walletdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the admin API.
    #[error("{0}")]
    Api(ApiError),

    /// The server answered 401; the local session has been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Login rejected or not possible.
    #[error("{0}")]
    Auth(String),

    /// Request payload rejected before it was sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Response body did not match the expected shape.
    #[error("Unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status carried by this error, if the server produced one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::SessionExpired => Some(401),
            _ => None,
        }
    }

    /// Message suitable for an operator-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Non-success answer from the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// Text from the response body, when the server sent one.
    pub message: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(f, "Request failed with status code {}", self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_displays_server_message() {
        let err = Error::Api(ApiError {
            status: 400,
            message: Some("Order is not in PAID state".into()),
        });
        assert_eq!(err.to_string(), "Order is not in PAID state");
        assert_eq!(err.user_message(), "Order is not in PAID state");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn api_error_without_body_names_status() {
        let err = Error::Api(ApiError {
            status: 502,
            message: None,
        });
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }

    #[test]
    fn session_expired_reports_401() {
        assert_eq!(Error::SessionExpired.status(), Some(401));
        assert!(Error::Config("x".into()).status().is_none());
    }

    #[test]
    fn validation_message_is_prefixed() {
        let err = Error::Validation("usdtRate must be positive".into());
        assert_eq!(err.user_message(), "Invalid input: usdtRate must be positive");
    }
}
