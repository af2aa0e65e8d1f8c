//! Error types for recipe-import
//!
//! This module provides the error taxonomy for the import engine:
//! - Domain errors (validation, missing records, provider failures)
//! - Storage errors with the failing operation attached
//! - HTTP status code mapping for the REST surface
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for recipe-import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for recipe-import
///
/// Concurrency conflicts on the dedup key never appear here: they are resolved
/// inside the import transaction by re-reading the winning row.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "steps.api_keys")
        key: Option<String>,
    },

    /// Malformed input, rejected before any write
    #[error("validation error: {0}")]
    Validation(String),

    /// Referenced recipe or user does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Third-party provider failure
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error (internal invariant breaches)
    #[error("{0}")]
    Other(String),
}

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect to database
    #[error("failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to run migrations
    #[error("failed to run migrations: {0}")]
    MigrationFailed(String),

    /// Query failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started, committed or rolled back
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Constraint violation other than the expected dedup collision
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Errors talking to the search or step-extraction provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection failure or unreadable response
    #[error("{provider} unavailable: {reason}")]
    Unavailable {
        /// Provider name (e.g., "edamam")
        provider: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Call exceeded its time budget
    #[error("{provider} timed out after {after_secs}s")]
    Timeout {
        /// Provider name
        provider: &'static str,
        /// Configured timeout in seconds
        after_secs: u64,
    },

    /// Provider answered with a non-success status
    #[error("{provider} returned HTTP {status}")]
    Status {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
    },

    /// The active credential's allowance is spent (HTTP 402)
    #[error("{provider} quota exhausted for the active credential")]
    QuotaExhausted {
        /// Provider name
        provider: &'static str,
    },

    /// Response body could not be decoded
    #[error("{provider} sent an invalid response: {reason}")]
    InvalidResponse {
        /// Provider name
        provider: &'static str,
        /// Decoding failure
        reason: String,
    },
}

impl ProviderError {
    /// Classify a reqwest failure for the given provider
    pub(crate) fn from_reqwest(provider: &'static str, timeout_secs: u64, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider,
                after_secs: timeout_secs,
            }
        } else if e.is_decode() {
            ProviderError::InvalidResponse {
                provider,
                reason: e.to_string(),
            }
        } else {
            ProviderError::Unavailable {
                provider,
                reason: e.to_string(),
            }
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "not found: recipe 42"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 400,
            Error::Validation(_) => 422,
            Error::NotFound(_) => 404,

            Error::Provider(ProviderError::Timeout { .. }) => 504,
            Error::Provider(_) => 502,
            Error::Network(_) => 502,

            Error::Database(_) => 500,
            Error::Sqlx(_) => 500,
            Error::Serialization(_) => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Database(_) | Error::Sqlx(_) => "database_error",
            Error::Provider(e) => match e {
                ProviderError::Unavailable { .. } => "provider_unavailable",
                ProviderError::Timeout { .. } => "provider_timeout",
                ProviderError::Status { .. } => "provider_error",
                ProviderError::QuotaExhausted { .. } => "provider_quota_exhausted",
                ProviderError::InvalidResponse { .. } => "provider_invalid_response",
            },
            Error::Network(_) => "network_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({ "key": key })),
            Error::Provider(ProviderError::Status { provider, status }) => {
                Some(serde_json::json!({
                    "provider": provider,
                    "upstream_status": status,
                }))
            }
            Error::Provider(ProviderError::Timeout {
                provider,
                after_secs,
            }) => Some(serde_json::json!({
                "provider": provider,
                "timeout_secs": after_secs,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
