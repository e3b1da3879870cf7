//! Error types for the comment relay
//!
//! `Error` is the crate-wide error used by configuration, auth and transport
//! code. `FetchError` is the narrower outcome of a comment accumulation and
//! is what request handlers map onto HTTP status codes.

use thiserror::Error;

/// The main error type for the relay
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// General configuration problem
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong
        message: String,
    },

    /// A required setting is absent
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Setting or variable name
        field: String,
    },

    /// A setting is present but unusable
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue {
        /// Setting or variable name
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// Config file is not valid YAML for [`crate::AppConfig`]
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON (de)serialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    /// Authorization-code exchange failed
    #[error("OAuth2 error: {message}")]
    OAuth2 {
        /// Details from the token endpoint
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport failure before a status was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the upstream
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body, or the upstream's error message
        body: String,
    },

    /// Upstream answered 429
    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        /// Value of `Retry-After`, or a default
        retry_after_seconds: u64,
    },

    /// Request exceeded its timeout
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// The timeout that expired
        timeout_ms: u64,
    },

    /// Every retry failed
    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded {
        /// Retries attempted
        max_retries: u32,
    },

    /// A URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Upstream Data Errors
    // ============================================================================
    /// Response body did not match the expected shape
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Parser message
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Filesystem or socket error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file does not exist
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up
        path: String,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else, usually with added context
    #[error("{0}")]
    Other(String),
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

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an OAuth2 error
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(429),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error signals that the requested resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is retryable at the transport level
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 500 | 502 | 503 | 504)
}

/// Result type alias for the relay
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

// ============================================================================
// Accumulation Outcome Errors
// ============================================================================

/// Why a comment accumulation did not produce a result list.
///
/// A failure always discards whatever was collected before it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The upstream reported that the resource does not exist
    #[error("Resource not found: {message}")]
    ResourceNotFound {
        /// Upstream description
        message: String,
    },

    /// Any other upstream or transport failure
    #[error("Upstream error: {message}")]
    Upstream {
        /// Upstream or transport description
        message: String,
    },

    /// The caller cancelled the accumulation between or during page fetches
    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Check if this is a not-found failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

impl From<Error> for FetchError {
    fn from(err: Error) -> Self {
        if err.is_not_found() {
            FetchError::ResourceNotFound {
                message: err.to_string(),
            }
        } else {
            FetchError::Upstream {
                message: err.to_string(),
            }
        }
    }
}
