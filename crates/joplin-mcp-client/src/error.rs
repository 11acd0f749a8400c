//! Error types for the Joplin Data API client

use thiserror::Error;

/// The Joplin Data API answered, but not with what was asked for.
///
/// Raised for any status of 400 or above, and for success responses whose
/// body is not a JSON object. `url` has the API token redacted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Joplin API error {status_code} for {method} {url}: {response_text}")]
pub struct BackendError {
    /// HTTP status code
    pub status_code: u16,
    /// Upper-case HTTP method
    pub method: String,
    /// Request URL, token redacted
    pub url: String,
    /// Trimmed response body, or a description of the unexpected payload
    pub response_text: String,
}

/// Errors that can occur when talking to the Joplin Data API
#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success or malformed response
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Connection failure or timeout
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Request payload could not be encoded
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Base URL and path did not form a valid URL
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for Joplin client operations
pub type Result<T> = std::result::Result<T, ClientError>;
