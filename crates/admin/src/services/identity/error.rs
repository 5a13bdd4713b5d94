//! Identity-provider errors.

use thiserror::Error;

/// Errors that can occur when verifying a session credential.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("identity request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("identity response error: {0}")]
    Response(String),

    /// The provider returned an unexpected status.
    #[error("identity API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },
}
