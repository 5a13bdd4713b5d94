//! Integration tests for Shopdeck.
//!
//! The admin router runs in-process against the in-memory datastore, a
//! static identity provider and a recording payment gateway. No database or
//! network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopdeck-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `admin_stores` - Store ownership, auth and health checks
//! - `admin_resources` - Billboard, category, color, size and product CRUD
//! - `admin_checkout` - Checkout orders, gateway requests and CORS
//! - `client_mutations` - The client mutation protocol against a live server

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use shopdeck_admin::{
    app,
    db::MemoryDatastore,
    state::AppState,
    test_support::{RecordingPaymentGateway, StaticIdentityProvider},
};
use shopdeck_core::StoreId;

/// Session token accepted for [`OWNER_ID`].
pub const OWNER_TOKEN: &str = "sess_owner";
pub const OWNER_ID: &str = "user_owner";
/// Session token accepted for [`INTRUDER_ID`], who owns nothing of the owner's.
pub const INTRUDER_TOKEN: &str = "sess_intruder";
pub const INTRUDER_ID: &str = "user_intruder";
/// Storefront URL the checkout redirects to.
pub const FRONTEND_STORE_URL: &str = "http://shop.test";

/// A fully wired admin app with handles on its fakes.
pub struct TestApp {
    pub router: Router,
    pub datastore: Arc<MemoryDatastore>,
    pub payments: Arc<RecordingPaymentGateway>,
}

/// Status and raw body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build the app with two known users and no data.
    ///
    /// # Panics
    ///
    /// Panics if the storefront URL constant does not parse.
    #[must_use]
    pub fn new() -> Self {
        let datastore = Arc::new(MemoryDatastore::new());
        let payments = Arc::new(RecordingPaymentGateway::new());
        let identity = StaticIdentityProvider::new()
            .with_user(OWNER_TOKEN, OWNER_ID)
            .with_user(INTRUDER_TOKEN, INTRUDER_ID);

        let state = AppState::new(
            Url::parse(FRONTEND_STORE_URL).expect("valid storefront URL"),
            datastore.clone(),
            Arc::new(identity),
            payments.clone(),
        );

        Self {
            router: app(state),
            datastore,
            payments,
        }
    }

    /// Send one request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Create a store owned by [`OWNER_ID`].
    ///
    /// # Panics
    ///
    /// Panics if the API does not answer 200 with an id.
    pub async fn create_store(&self, name: &str) -> StoreId {
        let response = self
            .post(
                "/api/stores",
                Some(OWNER_TOKEN),
                serde_json::json!({ "name": name }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        id_of(&response.json())
            .parse()
            .expect("store id is a UUID")
    }

    /// Create a resource in `store` as the owner and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the API does not answer 200.
    pub async fn create(&self, store: StoreId, segment: &str, body: Value) -> String {
        let response = self
            .post(&format!("/api/{store}/{segment}"), Some(OWNER_TOKEN), body)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        id_of(&response.json())
    }

    /// Seed a billboard, a category using it, a size and a color.
    ///
    /// # Panics
    ///
    /// Panics if any create fails.
    pub async fn seed_catalog(&self, store: StoreId) -> Catalog {
        let billboard = self
            .create(
                store,
                "billboards",
                serde_json::json!({ "label": "Summer", "imageUrl": "https://img.test/summer.png" }),
            )
            .await;
        let category = self
            .create(
                store,
                "categories",
                serde_json::json!({ "name": "Shirts", "billboardId": billboard }),
            )
            .await;
        let size = self
            .create(
                store,
                "sizes",
                serde_json::json!({ "name": "Large", "value": "L" }),
            )
            .await;
        let color = self
            .create(
                store,
                "colors",
                serde_json::json!({ "name": "Red", "value": "#f00" }),
            )
            .await;
        Catalog {
            billboard,
            category,
            size,
            color,
        }
    }

    /// Serve the app on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no port can be bound.
    pub async fn spawn(&self) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let router = self.router.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Url::parse(&format!("http://{addr}")).expect("valid server URL")
    }
}

/// Ids of a seeded catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub billboard: String,
    pub category: String,
    pub size: String,
    pub color: String,
}

impl Catalog {
    /// A valid product payload filed under this catalog.
    #[must_use]
    pub fn product(&self, name: &str, price: &str, featured: bool) -> Value {
        serde_json::json!({
            "name": name,
            "price": price,
            "categoryId": self.category,
            "sizeId": self.size,
            "colorId": self.color,
            "images": [{ "url": format!("https://img.test/{name}.png") }],
            "isFeatured": featured,
        })
    }
}

fn id_of(value: &Value) -> String {
    value["id"]
        .as_str()
        .expect("response has a string id")
        .to_owned()
}
