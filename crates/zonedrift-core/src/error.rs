use thiserror::Error;

/// Result type alias for zonedrift operations
pub type Result<T> = std::result::Result<T, DriftError>;

/// Errors that can occur while scanning a zone or notifying sinks
#[derive(Error, Debug)]
pub enum DriftError {
    /// A required configuration key is missing
    #[error("missing required configuration key: {key}")]
    Config {
        /// The flat path of the missing key, e.g. `route53/zoneId`
        key: String,
    },

    /// A configuration value could not be used
    #[error("invalid configuration value for {key}: {message}")]
    InvalidConfig {
        /// The flat path of the offending key
        key: String,
        /// What was wrong with the value
        message: String,
    },

    /// Zone enumeration failed after exhausting retries
    #[error("zone enumeration failed: {0}")]
    Enumeration(String),

    /// The zone or a requested resource does not exist
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// An API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolver could not be constructed or driven
    #[error("DNS error: {0}")]
    Dns(String),

    /// A notification sink failed
    #[error("notification failed: {0}")]
    Notify(String),
}

impl DriftError {
    /// Returns true if the error is worth retrying with backoff
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
