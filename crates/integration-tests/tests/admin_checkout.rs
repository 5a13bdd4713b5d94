//! Checkout: order creation, gateway requests and CORS.

use axum::http::{Method, StatusCode};
use serde_json::json;

use shopdeck_integration_tests::{OWNER_TOKEN, TestApp};

#[tokio::test]
async fn test_checkout_requires_products() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/checkout"),
            None,
            json!({ "productIds": [] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Product ids are required");
    assert!(app.payments.requests().is_empty());
}

#[tokio::test]
async fn test_checkout_creates_order_and_session() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let product = app
        .create(store, "products", catalog.product("tee", "19.99", false))
        .await;

    let response = app
        .post(
            &format!("/api/{store}/checkout"),
            None,
            json!({ "productIds": [product] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    let url = response.json()["url"].as_str().unwrap_or_default().to_owned();
    assert!(url.starts_with("https://checkout.stripe.test/c/pay/cs_test_"));

    let requests = app.payments.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.line_items.len(), 1);
    assert_eq!(request.line_items[0].name, "tee");
    assert_eq!(request.line_items[0].unit_amount, 1999);
    assert_eq!(request.line_items[0].quantity, 1);
    assert_eq!(request.success_url, "http://shop.test/cart?success=1");
    assert_eq!(request.cancel_url, "http://shop.test/cart?canceled=1");

    assert_eq!(app.datastore.order_count().ok(), Some(1));
    let items = app.datastore.order_items(request.order_id).unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id.to_string(), product);
}

#[tokio::test]
async fn test_checkout_is_public_with_or_without_session() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let product = app
        .create(store, "products", catalog.product("tee", "5", false))
        .await;

    let response = app
        .post(
            &format!("/api/{store}/checkout"),
            Some(OWNER_TOKEN),
            json!({ "productIds": [product] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_checkout_preflight_allows_any_origin() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri(format!("/api/{store}/checkout"))
        .header("origin", "http://shop.test")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty());
    let Ok(request) = request else {
        panic!("request builds");
    };
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap_or_else(|never| match never {});

    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_checkout_response_carries_cors_header() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri(format!("/api/{store}/checkout"))
        .header("origin", "http://shop.test")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"productIds":[]}"#));
    let Ok(request) = request else {
        panic!("request builds");
    };
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap_or_else(|never| match never {});

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_gateway_failure_is_502() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let product = app
        .create(store, "products", catalog.product("tee", "19.99", false))
        .await;
    app.payments.set_failing(true);

    let response = app
        .post(
            &format!("/api/{store}/checkout"),
            None,
            json!({ "productIds": [product] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.text(), "External service error");
}

#[tokio::test]
async fn test_unknown_products_are_404() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/checkout"),
            None,
            json!({ "productIds": [uuid::Uuid::new_v4()] }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.datastore.order_count().ok(), Some(0));
}
