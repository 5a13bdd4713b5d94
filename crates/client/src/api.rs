//! Admin API HTTP client.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use shopdeck_core::{
    CheckoutInput, CheckoutResponse, ProductDetail, ProductQuery, ResourceKind, Store, StoreId,
};

use crate::ClientError;

/// Client for the admin JSON API.
///
/// Keeps a cookie store so a session cookie set by the server rides along
/// with later requests, the way a browser would send it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
    ) -> Result<RequestBuilder, ClientError> {
        let builder = self.client.request(method, self.url(path)?);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and decode the JSON body.
    ///
    /// An empty 2xx body decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the plain-text body on non-2xx,
    /// `ClientError::Request` if the request could not be sent and
    /// `ClientError::Response` if the body is not JSON.
    #[instrument(skip(self, token, body))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&SecretString>,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ClientError> {
        let mut builder = self.request(method, path, token)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        decode(response).await
    }

    /// The caller's stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn list_stores(&self, token: &SecretString) -> Result<Vec<Store>, ClientError> {
        let value = self
            .send(Method::GET, &stores_path(None), Some(token), None)
            .await?;
        from_value(value)
    }

    /// All rows of a resource in a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        store_id: StoreId,
        kind: ResourceKind,
    ) -> Result<Vec<T>, ClientError> {
        let value = self
            .send(Method::GET, &collection_path(store_id, kind), None, None)
            .await?;
        from_value(value)
    }

    /// One row of a resource, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        store_id: StoreId,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<T>, ClientError> {
        let value = self
            .send(Method::GET, &item_path(store_id, kind, id), None, None)
            .await?;
        from_value(value)
    }

    /// Products in a store, filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        store_id: StoreId,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDetail>, ClientError> {
        let response = self
            .request(
                Method::GET,
                &collection_path(store_id, ResourceKind::Product),
                None,
            )?
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        from_value(decode(response).await?)
    }

    /// Open a hosted checkout for the given products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn checkout(
        &self,
        store_id: StoreId,
        input: &CheckoutInput,
    ) -> Result<CheckoutResponse, ClientError> {
        let body = serde_json::to_value(input).map_err(|e| ClientError::Request(e.to_string()))?;
        let value = self
            .send(
                Method::POST,
                &format!("/api/{store_id}/checkout"),
                None,
                Some(&body),
            )
            .await?;
        from_value(value)
    }
}

/// `/api/stores` or `/api/stores/{id}`.
#[must_use]
pub fn stores_path(store_id: Option<StoreId>) -> String {
    store_id.map_or_else(|| "/api/stores".to_owned(), |id| format!("/api/stores/{id}"))
}

/// `/api/{storeId}/{resource}`.
#[must_use]
pub fn collection_path(store_id: StoreId, kind: ResourceKind) -> String {
    format!("/api/{store_id}/{}", kind.path_segment())
}

/// `/api/{storeId}/{resource}/{id}`.
#[must_use]
pub fn item_path(store_id: StoreId, kind: ResourceKind, id: Uuid) -> String {
    format!("{}/{id}", collection_path(store_id, kind))
}

async fn decode(response: reqwest::Response) -> Result<serde_json::Value, ClientError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ClientError::Response(e.to_string()))?;

    if !status.is_success() {
        warn!(%status, "Admin API returned an error");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: text,
        });
    }

    if text.is_empty() || status == StatusCode::NO_CONTENT {
        debug!(%status, "Empty response body");
        return Ok(serde_json::Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| ClientError::Response(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Response(e.to_string()))
}
