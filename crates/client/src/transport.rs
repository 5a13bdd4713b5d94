//! Mutation transport.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::{ApiClient, ClientError, MutationRequest};

/// Carries a mutation to the server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one mutation attempt and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error for any failed request or non-2xx answer.
    async fn execute(
        &self,
        request: &MutationRequest,
        token: &SecretString,
    ) -> Result<serde_json::Value, ClientError>;
}

/// [`Transport`] over the admin HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api: ApiClient,
}

impl HttpTransport {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &MutationRequest,
        token: &SecretString,
    ) -> Result<serde_json::Value, ClientError> {
        self.api
            .send(
                request.verb().method(),
                &request.path(),
                Some(token),
                request.body(),
            )
            .await
    }
}
