//! Error type definitions for the IPTV device API

use thiserror::Error;

use crate::utils::url::UrlUtils;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures of a single outbound probe (HEAD or ranged GET)
///
/// These never escape the playlist validator; they are folded into the
/// verdict. The URL inside messages is always credential-obfuscated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The probe did not complete within its bound
    #[error("Probe timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The probe was cancelled by its caller
    #[error("Probe cancelled")]
    Cancelled,

    /// Connection, TLS, DNS or body read failure
    #[error("Network failure: {message}")]
    Network { message: String },
}

/// Request body extraction errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Body is not declared as JSON
    #[error("Expected a JSON body (Content-Type: application/json)")]
    UnsupportedMediaType,

    /// Body exceeds `web.max_request_size`
    #[error("Request body exceeds the configured size limit")]
    PayloadTooLarge,

    /// Body could not be read
    #[error("Failed to read request body: {message}")]
    InvalidBody { message: String },

    /// JSON parsing errors
    #[error("Invalid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl ProbeError {
    /// Map a reqwest transport error, keeping credentials out of the message
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        // a reqwest timeout here is the connect timeout; the probe bound
        // itself is enforced by the validator and reported as `Timeout`
        Self::Network {
            message: UrlUtils::obfuscate_credentials(&error.to_string()),
        }
    }
}

impl WebError {
    /// Create an error for a body that could not be read
    pub fn invalid_body<M: Into<String>>(message: M) -> Self {
        Self::InvalidBody {
            message: message.into(),
        }
    }
}
