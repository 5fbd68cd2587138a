//! Error types for VDS REST operations.
//!
//! This module provides the error type shared by the VDS client crates, including
//! mapping from transport failures and non-success HTTP responses.

use crate::client::{truncate_chars, ERROR_BODY_LIMIT};
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for VDS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// VDS endpoint could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// None of the candidate REST roots answered a probe
    #[error("REST root not found: {0}")]
    RootNotFound(String),

    /// Search returned a non-success status
    #[error("Search failed with status {status}: {body}")]
    SearchFailed {
        /// HTTP status code returned by the gateway
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Failed to parse a VDS response
    #[error("Failed to parse VDS response: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for VDS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a [`Error::SearchFailed`] from a response status and body.
    ///
    /// The body is truncated to [`ERROR_BODY_LIMIT`] characters.
    #[must_use]
    pub fn search_failed(status: StatusCode, body: &str) -> Self {
        Self::SearchFailed {
            status: status.as_u16(),
            body: truncate_chars(body, ERROR_BODY_LIMIT).to_string(),
        }
    }

    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::RootNotFound(_) => "ROOT_NOT_FOUND",
            Self::SearchFailed { .. } => "SEARCH_FAILED",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Returns true for network-level failures (connect, timeout, TLS).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable(_) | Self::Timeout(_) | Self::HttpError(_)
        )
    }

    /// Returns the HTTP status carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::SearchFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
