//! External collaborators of the admin API.
//!
//! # Services
//!
//! - `identity` - Session-token verification against the auth provider
//! - `payments` - Hosted checkout sessions via Stripe

pub mod identity;
pub mod payments;

pub use identity::{ClerkClient, IdentityError, IdentityProvider, Principal};
pub use payments::{
    CheckoutSession, CheckoutSessionRequest, LineItem, PaymentError, PaymentGateway, StripeClient,
};
