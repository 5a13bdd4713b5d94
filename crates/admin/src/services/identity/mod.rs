//! Identity collaborator.
//!
//! The admin API never issues sessions itself. Every request carries a
//! session token minted by the external auth provider, and the server asks
//! the provider to verify it on each request. A verified token yields a
//! [`Principal`].
//!
//! - [`IdentityProvider`] - the seam handlers depend on
//! - [`ClerkClient`] - HTTP implementation against the provider's backend API

mod client;
mod error;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use shopdeck_core::UserId;

pub use client::ClerkClient;
pub use error::IdentityError;

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Provider-issued user id; stores are owned by this value.
    pub user_id: UserId,
}

/// Verifies bearer credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a session token to its user.
    ///
    /// Returns `Ok(None)` when the token is unknown, expired or revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or answers with
    /// something other than a verdict.
    async fn verify(&self, token: &SecretString) -> Result<Option<Principal>, IdentityError>;
}
