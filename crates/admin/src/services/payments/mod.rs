//! Payment collaborator.
//!
//! Checkout hands the shopper off to a hosted payment page. This module
//! owns the seam ([`PaymentGateway`]) and the Stripe implementation
//! ([`StripeClient`]). Webhook reconciliation of paid orders is not handled
//! here.

mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::{StripeClient, checkout_session_form};
pub use error::PaymentError;
pub use types::{CheckoutSession, CheckoutSessionRequest, LineItem};

/// Creates hosted checkout sessions.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session for the given line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway is unreachable or rejects the request.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
