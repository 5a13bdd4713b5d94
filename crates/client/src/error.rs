//! Client errors.

use thiserror::Error;

/// Errors that can occur when calling the admin API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("response error: {0}")]
    Response(String),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Plain-text response body.
        message: String,
    },

    /// A URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// No credential could be obtained.
    #[error("credentials unavailable: {0}")]
    Credentials(String),
}

impl ClientError {
    /// Status code, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
