//! Payment-gateway errors.

use thiserror::Error;

/// Errors that can occur when talking to the payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("payment request failed: {0}")]
    Request(String),

    /// Failed to parse response.
    #[error("payment response error: {0}")]
    Response(String),

    /// The gateway rejected the request.
    #[error("payment API error: {0}")]
    Api(String),
}
