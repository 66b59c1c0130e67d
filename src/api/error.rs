//! Error types for the status API client.

use thiserror::Error;

/// Errors raised while talking to the job/asset status API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success HTTP status.
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Transport failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered 2xx with a body that is not the expected JSON.
    #[error("invalid API response body: {0}")]
    Decode(#[from] serde_json::Error),
}
