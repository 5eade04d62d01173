//! Error types for upstream API operations

use thiserror::Error;

/// Errors surfaced by the catalog and listings clients.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The HTTP request itself failed (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response body did not parse as the expected JSON shape
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Upstream answered with a non-success status
    #[error("upstream error {status}: {message}")]
    Upstream {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Upstream signalled a rate limit (HTTP 429)
    #[error("rate limited by upstream")]
    RateLimited,

    /// A catalog row did not conform to the record schema
    #[error("invalid catalog record: {0}")]
    InvalidRecord(String),
}

impl TrackerError {
    /// Map a non-success status onto the matching variant. 429 gets its
    /// own variant so callers can keep partial results on rate limits.
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            TrackerError::RateLimited
        } else {
            TrackerError::Upstream { status, message }
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
