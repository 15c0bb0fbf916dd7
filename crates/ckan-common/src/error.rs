//! Error types for the CKAN client
//!
//! Every failure a caller can observe falls into one of three classes:
//!
//! - **Transport**: the HTTP exchange itself did not complete, or the server
//!   answered with a non-2xx status and no readable envelope.
//! - **API-reported**: the envelope parsed but carried `success: false`.
//! - **Malformed response**: the envelope claimed success but the result does
//!   not have the shape this library expects.
//!
//! Use [`CkanError::is_transport`], [`CkanError::is_api`] and
//! [`CkanError::is_malformed`] to branch on the class.

use thiserror::Error;

/// Fixed message for every malformed-response failure.
pub const MALFORMED_API_RESPONSE: &str = "Malformed API response, cannot parse data.";

/// Message used when the upstream reports a failure without a message.
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Result type alias for CKAN operations
pub type Result<T> = std::result::Result<T, CkanError>;

/// Main error type for CKAN operations
#[derive(Error, Debug)]
pub enum CkanError {
    /// The HTTP exchange failed (connection, timeout, body read, invalid URL)
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status and no CKAN envelope
    #[error("Server responded with HTTP {status} and no readable API envelope")]
    HttpStatus { status: u16, body: String },

    /// The API envelope reported `success: false`
    #[error("API error: {message}")]
    Api {
        message: String,
        /// The upstream `__type` tag, e.g. "Not Found Error"
        kind: Option<String>,
    },

    /// The result did not have the shape the caller expects
    #[error("{}", MALFORMED_API_RESPONSE)]
    MalformedResponse,

    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request parameters could not be serialized
    #[error("Failed to encode request parameters: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CkanError {
    /// Create an API error without an upstream type tag
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Did the HTTP exchange itself fail?
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }

    /// Did the upstream report the failure through its envelope?
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Was the response rejected by local shape validation?
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_is_constant() {
        assert_eq!(CkanError::MalformedResponse.to_string(), MALFORMED_API_RESPONSE);
    }

    #[test]
    fn test_api_error_classification() {
        let err = CkanError::api("Not found: Dataset");
        assert!(err.is_api());
        assert!(!err.is_transport());
        assert!(!err.is_malformed());
        assert_eq!(err.to_string(), "API error: Not found: Dataset");
    }

    #[test]
    fn test_http_status_is_transport() {
        let err = CkanError::HttpStatus {
            status: 502,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert!(err.is_transport());
        assert!(!err.is_api());
        assert!(err.to_string().contains("502"));
    }
}
