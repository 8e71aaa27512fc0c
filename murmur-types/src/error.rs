//! Error types for all murmur crates.

use std::time::Duration;

/// Errors from the chat and speech services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Required configuration (API key, credential) is missing.
    ///
    /// Always raised before any request is sent.
    #[error("configuration error: {0}")]
    Config(String),

    // Retryable errors
    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Rate limited by the service.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimit {
        /// Suggested retry delay, if provided by the API.
        retry_after: Option<Duration>,
    },
    /// Service is temporarily unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// The response body failed mid-stream.
    #[error("stream error: {0}")]
    Stream(String),

    // Terminal errors
    /// Authentication/authorization failure.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Malformed or rejected request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Endpoint or model does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The service answered with something we cannot use.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout(_)
                | Self::RateLimit { .. }
                | Self::ServiceUnavailable(_)
                | Self::Stream(_)
        )
    }
}

/// Errors from loading an example dialogue.
#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    /// Reading a local file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Fetching a remote resource failed.
    #[error("failed to fetch {url}: {message}")]
    Http {
        /// The URL that could not be fetched.
        url: String,
        /// What went wrong.
        message: String,
    },
}
