//! Auth-provider backend API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use shopdeck_core::UserId;

use super::{IdentityError, IdentityProvider, Principal};

/// Session status reported for a live session.
const ACTIVE: &str = "active";

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    user_id: String,
    status: String,
}

/// Verifies session tokens against the provider's backend API.
///
/// Authenticates with the instance secret key and posts the caller's token
/// to `{api_url}/sessions/verify`. A `2xx` with an `active` session is a
/// verified caller; `401`/`404`/`422` mean the token is not valid.
#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    api_url: Url,
    secret_key: SecretString,
}

impl std::fmt::Debug for ClerkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkClient")
            .field("api_url", &self.api_url.as_str())
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ClerkClient {
    /// Create a new client.
    #[must_use]
    pub fn new(api_url: Url, secret_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            api_url,
            secret_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/sessions/verify", self.api_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    #[instrument(skip(self, token))]
    async fn verify(&self, token: &SecretString) -> Result<Option<Principal>, IdentityError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.secret_key.expose_secret())
            .json(&VerifyRequest {
                token: token.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY
        ) {
            debug!(%status, "Session token rejected");
            return Ok(None);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%status, "Identity provider returned an error");
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let session: VerifyResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Response(e.to_string()))?;

        if session.status != ACTIVE {
            debug!(status = %session.status, "Session is not active");
            return Ok(None);
        }

        Ok(Some(Principal {
            user_id: UserId::new(session.user_id),
        }))
    }
}
