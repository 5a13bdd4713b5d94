//! Billboard, category, color, size and product endpoints.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};

use shopdeck_core::StoreId;
use shopdeck_integration_tests::{INTRUDER_TOKEN, OWNER_TOKEN, TestApp};

/// Create a store owned by the intruder and return its id.
async fn intruder_store(app: &TestApp) -> StoreId {
    let response = app
        .post("/api/stores", Some(INTRUDER_TOKEN), json!({ "name": "Theirs" }))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.text());
    response.json()["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .unwrap_or_else(|| panic!("store id in {}", response.text()))
}

// =============================================================================
// Billboards
// =============================================================================

#[tokio::test]
async fn test_billboard_create_and_get() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/billboards"),
            Some(OWNER_TOKEN),
            json!({ "label": "Summer", "imageUrl": "https://img.test/a.png" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let created = response.json();
    assert_eq!(created["label"], "Summer");
    assert_eq!(created["imageUrl"], "https://img.test/a.png");
    assert_eq!(created["storeId"], store.to_string());

    let id = created["id"].as_str().unwrap_or_default();
    let fetched = app.get(&format!("/api/{store}/billboards/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["label"], "Summer");
}

#[tokio::test]
async fn test_billboard_create_requires_session() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/billboards"),
            None,
            json!({ "label": "Summer", "imageUrl": "https://img.test/a.png" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_billboard_create_in_foreign_store_is_403() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/billboards"),
            Some(INTRUDER_TOKEN),
            json!({ "label": "Spam", "imageUrl": "https://img.test/spam.png" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get(&format!("/api/{store}/billboards")).await.json(), json!([]));
}

#[tokio::test]
async fn test_validation_runs_before_ownership() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/billboards"),
            Some(INTRUDER_TOKEN),
            json!({ "label": "", "imageUrl": "https://img.test/a.png" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Label is required");
}

#[tokio::test]
async fn test_billboard_delete_blocked_by_category() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;

    let response = app
        .delete(
            &format!("/api/{store}/billboards/{}", catalog.billboard),
            Some(OWNER_TOKEN),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal error");
    let still_there = app
        .get(&format!("/api/{store}/billboards/{}", catalog.billboard))
        .await;
    assert_eq!(still_there.json()["label"], "Summer");
}

#[tokio::test]
async fn test_billboard_delete_returns_count() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let id = app
        .create(
            store,
            "billboards",
            json!({ "label": "Winter", "imageUrl": "https://img.test/w.png" }),
        )
        .await;

    let response = app
        .delete(&format!("/api/{store}/billboards/{id}"), Some(OWNER_TOKEN))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["count"], 1);
    let gone = app.get(&format!("/api/{store}/billboards/{id}")).await;
    assert!(gone.json().is_null());
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_category_get_expands_billboard() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;

    let response = app
        .get(&format!("/api/{store}/categories/{}", catalog.category))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let category = response.json();
    assert_eq!(category["name"], "Shirts");
    assert_eq!(category["billboardId"], catalog.billboard);
    assert_eq!(category["billboard"]["label"], "Summer");
}

#[tokio::test]
async fn test_category_requires_billboard() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/categories"),
            Some(OWNER_TOKEN),
            json!({ "name": "Shirts" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Billboard id is required");
}

#[tokio::test]
async fn test_blank_billboard_id_reads_as_missing() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/categories"),
            Some(OWNER_TOKEN),
            json!({ "name": "Shirts", "billboardId": "" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Billboard id is required");
}

#[tokio::test]
async fn test_null_name_reads_as_missing() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;

    let response = app
        .post(
            &format!("/api/{store}/categories"),
            Some(OWNER_TOKEN),
            json!({ "name": null, "billboardId": catalog.billboard }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Name is required");
}

#[tokio::test]
async fn test_mistyped_body_is_plain_400() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .post(
            &format!("/api/{store}/categories"),
            Some(OWNER_TOKEN),
            json!({ "name": 7, "billboardId": "not-a-uuid" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Invalid request body");
}

#[tokio::test]
async fn test_unparseable_body_is_plain_400() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/{store}/sizes"))
        .header(header::AUTHORIZATION, format!("Bearer {OWNER_TOKEN}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "));
    let Ok(request) = request else {
        panic!("request builds");
    };
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap_or_else(|never| match never {});

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    assert_eq!(&body[..], b"Invalid request body");
}

#[tokio::test]
async fn test_malformed_store_id_is_400() {
    let app = TestApp::new();

    let response = app.get("/api/not-a-store/categories").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Invalid id");
}

// =============================================================================
// Colors and sizes
// =============================================================================

#[tokio::test]
async fn test_color_value_must_be_hex() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let uri = format!("/api/{store}/colors");

    let missing_hash = app
        .post(&uri, Some(OWNER_TOKEN), json!({ "name": "Red", "value": "ff0000" }))
        .await;
    assert_eq!(missing_hash.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_hash.text(), "Value must be a valid hex code");

    let too_short = app
        .post(&uri, Some(OWNER_TOKEN), json!({ "name": "Red", "value": "#ff" }))
        .await;
    assert_eq!(too_short.status, StatusCode::BAD_REQUEST);

    let short_form = app
        .post(&uri, Some(OWNER_TOKEN), json!({ "name": "White", "value": "#fff" }))
        .await;
    assert_eq!(short_form.status, StatusCode::OK);
    assert_eq!(short_form.json()["value"], "#fff");
}

#[tokio::test]
async fn test_size_update_and_delete() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let id = app
        .create(store, "sizes", json!({ "name": "Small", "value": "S" }))
        .await;
    let uri = format!("/api/{store}/sizes/{id}");

    let updated = app
        .patch(&uri, Some(OWNER_TOKEN), json!({ "name": "Medium", "value": "M" }))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["value"], "M");

    let deleted = app.delete(&uri, Some(OWNER_TOKEN)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/api/{store}/sizes")).await.json(), json!([]));
}

#[tokio::test]
async fn test_update_missing_row_is_404() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .patch(
            &format!("/api/{store}/sizes/{}", uuid::Uuid::new_v4()),
            Some(OWNER_TOKEN),
            json!({ "name": "Medium", "value": "M" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not found");
}

#[tokio::test]
async fn test_get_missing_row_is_null() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;

    let response = app
        .get(&format!("/api/{store}/colors/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json().is_null());
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_create_includes_images() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;

    let response = app
        .post(
            &format!("/api/{store}/products"),
            Some(OWNER_TOKEN),
            catalog.product("tee", "19.99", false),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let product = response.json();
    assert_eq!(product["name"], "tee");
    assert_eq!(product["price"], "19.99");
    assert_eq!(product["images"][0]["url"], "https://img.test/tee.png");
}

#[tokio::test]
async fn test_product_requires_price() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let mut payload = catalog.product("tee", "19.99", false);
    if let Some(fields) = payload.as_object_mut() {
        fields.remove("price");
    }

    let response = app
        .post(&format!("/api/{store}/products"), Some(OWNER_TOKEN), payload)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Price is required");
}

#[tokio::test]
async fn test_blank_price_reads_as_missing() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;

    let response = app
        .post(
            &format!("/api/{store}/products"),
            Some(OWNER_TOKEN),
            catalog.product("tee", "", false),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "Price is required");
}

#[tokio::test]
async fn test_product_list_hides_archived_and_filters_featured() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    app.create(store, "products", catalog.product("plain", "10", false))
        .await;
    app.create(store, "products", catalog.product("star", "12", true))
        .await;
    let mut archived = catalog.product("old", "5", false);
    archived["isArchived"] = json!(true);
    app.create(store, "products", archived).await;

    let all = app.get(&format!("/api/{store}/products")).await.json();
    let mut names: Vec<&str> = all
        .as_array()
        .map(|rows| rows.iter().filter_map(|p| p["name"].as_str()).collect())
        .unwrap_or_default();
    names.sort_unstable();
    assert_eq!(names, vec!["plain", "star"]);
    assert_eq!(all[0]["category"]["name"], "Shirts");

    let featured = app
        .get(&format!("/api/{store}/products?isFeatured=true"))
        .await
        .json();
    assert_eq!(featured.as_array().map(Vec::len), Some(1));
    assert_eq!(featured[0]["name"], "star");
}

#[tokio::test]
async fn test_product_update_replaces_images() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let id = app
        .create(store, "products", catalog.product("tee", "19.99", false))
        .await;

    let mut payload = catalog.product("tee", "24.50", false);
    payload["images"] = json!([
        { "url": "https://img.test/front.png" },
        { "url": "https://img.test/back.png" },
    ]);
    let response = app
        .patch(&format!("/api/{store}/products/{id}"), Some(OWNER_TOKEN), payload)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let product = app.get(&format!("/api/{store}/products/{id}")).await.json();
    assert_eq!(product["price"], "24.50");
    let urls: Vec<&str> = product["images"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|i| i["url"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(
        urls,
        vec!["https://img.test/front.png", "https://img.test/back.png"]
    );
}

#[tokio::test]
async fn test_datastore_failure_on_public_read_is_500() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    app.datastore.set_failing(true);

    let response = app.get(&format!("/api/{store}/products")).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal error");
}

// =============================================================================
// Cross-store references
// =============================================================================

#[tokio::test]
async fn test_category_cannot_use_another_stores_billboard() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let theirs = intruder_store(&app).await;

    let response = app
        .post(
            &format!("/api/{theirs}/categories"),
            Some(INTRUDER_TOKEN),
            json!({ "name": "Borrowed", "billboardId": catalog.billboard }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "Internal error");
    assert_eq!(app.get(&format!("/api/{theirs}/categories")).await.json(), json!([]));

    // Nothing outside the owner's store pins the billboard.
    let category = app
        .delete(
            &format!("/api/{store}/categories/{}", catalog.category),
            Some(OWNER_TOKEN),
        )
        .await;
    assert_eq!(category.status, StatusCode::OK);
    let billboard = app
        .delete(
            &format!("/api/{store}/billboards/{}", catalog.billboard),
            Some(OWNER_TOKEN),
        )
        .await;
    assert_eq!(billboard.status, StatusCode::OK);
}

#[tokio::test]
async fn test_category_update_cannot_move_to_another_stores_billboard() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let theirs = intruder_store(&app).await;
    let their_billboard = app
        .post(
            &format!("/api/{theirs}/billboards"),
            Some(INTRUDER_TOKEN),
            json!({ "label": "Theirs", "imageUrl": "https://img.test/t.png" }),
        )
        .await
        .json()["id"]
        .clone();

    let response = app
        .patch(
            &format!("/api/{store}/categories/{}", catalog.category),
            Some(OWNER_TOKEN),
            json!({ "name": "Shirts", "billboardId": their_billboard }),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let category = app
        .get(&format!("/api/{store}/categories/{}", catalog.category))
        .await
        .json();
    assert_eq!(category["billboardId"], catalog.billboard);
}

#[tokio::test]
async fn test_product_cannot_use_another_stores_catalog() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let theirs = intruder_store(&app).await;

    let response = app
        .post(
            &format!("/api/{theirs}/products"),
            Some(INTRUDER_TOKEN),
            catalog.product("knockoff", "1", false),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.get(&format!("/api/{theirs}/products")).await.json(), json!([]));
    let size = app
        .delete(&format!("/api/{store}/sizes/{}", catalog.size), Some(OWNER_TOKEN))
        .await;
    assert_eq!(size.status, StatusCode::OK);
}

// =============================================================================
// Access control
// =============================================================================

/// Owner's view of the store and every resource list in it.
async fn snapshot(app: &TestApp, store: StoreId) -> Vec<Value> {
    let mut views = vec![
        app.request(
            Method::GET,
            &format!("/api/stores/{store}"),
            Some(OWNER_TOKEN),
            None,
        )
        .await
        .json(),
    ];
    for segment in ["billboards", "categories", "colors", "sizes", "products"] {
        views.push(app.get(&format!("/api/{store}/{segment}")).await.json());
    }
    views
}

#[tokio::test]
async fn test_every_mutation_checks_session_then_ownership() {
    let app = TestApp::new();
    let store = app.create_store("Shop").await;
    let catalog = app.seed_catalog(store).await;
    let product = app
        .create(store, "products", catalog.product("tee", "19.99", false))
        .await;

    let resources = [
        (
            "billboards",
            catalog.billboard.clone(),
            json!({ "label": "Spam", "imageUrl": "https://img.test/spam.png" }),
        ),
        (
            "categories",
            catalog.category.clone(),
            json!({ "name": "Spam", "billboardId": catalog.billboard }),
        ),
        (
            "colors",
            catalog.color.clone(),
            json!({ "name": "Spam", "value": "#000" }),
        ),
        (
            "sizes",
            catalog.size.clone(),
            json!({ "name": "Spam", "value": "XS" }),
        ),
        ("products", product, catalog.product("spam", "1", false)),
    ];

    let mut routes = vec![
        (
            Method::PATCH,
            format!("/api/stores/{store}"),
            Some(json!({ "name": "Spam" })),
        ),
        (Method::DELETE, format!("/api/stores/{store}"), None),
    ];
    for (segment, id, body) in resources {
        routes.push((
            Method::POST,
            format!("/api/{store}/{segment}"),
            Some(body.clone()),
        ));
        routes.push((
            Method::PATCH,
            format!("/api/{store}/{segment}/{id}"),
            Some(body),
        ));
        routes.push((Method::DELETE, format!("/api/{store}/{segment}/{id}"), None));
    }

    let before = snapshot(&app, store).await;
    for (method, uri, body) in &routes {
        let anonymous = app.request(method.clone(), uri, None, body.clone()).await;
        assert_eq!(
            anonymous.status,
            StatusCode::UNAUTHORIZED,
            "{method} {uri} without a session"
        );

        let intruder = app
            .request(method.clone(), uri, Some(INTRUDER_TOKEN), body.clone())
            .await;
        assert_eq!(
            intruder.status,
            StatusCode::FORBIDDEN,
            "{method} {uri} from a non-owner"
        );
        assert_eq!(intruder.text(), "Unauthorized");
    }
    assert_eq!(snapshot(&app, store).await, before);
}
