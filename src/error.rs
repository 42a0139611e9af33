//! Error types for stash-api
//!
//! This module defines the error hierarchy for the whole crate.
//! Once a fetch has started, these errors travel through the `error`
//! event rather than being returned directly.

use thiserror::Error;

/// The main error type for stash-api
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max attempts ({max_attempts}) exceeded")]
    MaxRetriesExceeded { max_attempts: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported HTTP method {method}: only read requests are issued")]
    UnsupportedMethod { method: String },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Unexpected page shape from '{endpoint}': {message}")]
    PageContract { endpoint: String, message: String },

    #[error("Field '{field}' missing from upstream result")]
    Extraction { field: String },

    #[error("Fetch ended without a terminal event")]
    Incomplete,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a page contract error
    pub fn page_contract(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PageContract {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(field: impl Into<String>) -> Self {
        Self::Extraction {
            field: field.into(),
        }
    }

    /// Check if this error is worth another attempt at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_connect() || e.is_timeout(),
            Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500..=599)
}

/// Result type alias for stash-api
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("hostname");
        assert_eq!(err.to_string(), "Missing required config field: hostname");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::extraction("fromRef.latestChangeset");
        assert_eq!(
            err.to_string(),
            "Field 'fromRef.latestChangeset' missing from upstream result"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::http_status(404, "").is_retryable());
        assert!(!Error::page_contract("projects", "no values").is_retryable());
        assert!(!Error::Incomplete.is_retryable());
    }
}
