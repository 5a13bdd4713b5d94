//! Credential source for mutations.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::ClientError;

/// Supplies bearer tokens for mutation requests.
///
/// Session tokens from the auth provider are short-lived. The provider's
/// SDK only refreshes on a focus event, so the mutation procedure signals
/// one before every attempt and then asks for a token.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Signal the provider that the session should be refreshed.
    async fn refresh_session(&self);

    /// A current bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Credentials` if no session is available.
    async fn token(&self) -> Result<SecretString, ClientError>;
}

/// A fixed token, for scripts and the CLI.
pub struct StaticCredentials {
    token: SecretString,
}

impl StaticCredentials {
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn refresh_session(&self) {}

    async fn token(&self) -> Result<SecretString, ClientError> {
        Ok(self.token.clone())
    }
}
