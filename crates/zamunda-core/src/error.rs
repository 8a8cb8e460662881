//! Error types for the zamunda.net scraper
//!
//! Provides a single error enum with human-readable messages and
//! string serialization for API payloads.

use reqwest::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all zamunda.net scraper operations
///
/// Request errors are split into three kinds because they are handled
/// differently: connection failures are the only retryable class,
/// timeouts always fail fast, and everything else propagates as-is.
#[derive(Error, Debug)]
pub enum ZamundaError {
    /// Username or password was empty; raised before any network call
    #[error("Invalid credentials: username and password must be non-empty")]
    InvalidCredentials,

    /// Connection-level failure (refused, reset, unreachable)
    #[error("Connection failed: {0}")]
    ConnectionFailed(reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),

    /// Any other HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// Server answered with a non-success status where one was required
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(StatusCode),

    /// Authentication gave up after the configured attempts
    #[error("Login failed after {0} attempts")]
    LoginFailed(u32),

    /// HTML did not match the expected page structure
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    /// Response body was not a valid bencoded torrent file
    #[error("Failed to decode torrent file: {0}")]
    TorrentDecode(String),
}

impl From<reqwest::Error> for ZamundaError {
    fn from(error: reqwest::Error) -> Self {
        // Timeout wins over connect: connect timeouts report both flags
        if error.is_timeout() {
            ZamundaError::Timeout(error)
        } else if error.is_connect() {
            ZamundaError::ConnectionFailed(error)
        } else {
            ZamundaError::Http(error)
        }
    }
}

impl Serialize for ZamundaError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for zamunda.net operations
pub type Result<T> = std::result::Result<T, ZamundaError>;
