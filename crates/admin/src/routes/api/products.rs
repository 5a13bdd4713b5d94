//! Product handlers.
//!
//! Reads expand images, category, size and color. The public listing never
//! includes archived products.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{
    DeleteResult, NewProduct, ProductDetail, ProductId, ProductInput, ProductQuery,
    ProductWithImages, StoreId,
};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, AppQuery, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/products", get(list).post(create))
        .route(
            "/api/{store_id}/products/{product_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List a store's products, newest first.
///
/// Accepts `categoryId`, `colorId`, `sizeId` and `isFeatured` filters.
#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> Result<Json<Vec<ProductDetail>>, AppError> {
    let products = state
        .datastore()
        .list_products(store_id, &query)
        .await
        .tag("PRODUCTS_GET")?;
    Ok(Json(products))
}

/// Create a product with its images.
///
/// # Errors
///
/// 400 when a required field is missing, the price is not positive, or no
/// image is given. 403 when the caller does not own the store.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<Json<ProductWithImages>, AppError> {
    let product = NewProduct::try_from(input)?;
    authorize(&state, &principal, store_id)
        .await
        .tag("PRODUCTS_POST")?;

    let product = state
        .datastore()
        .create_product(store_id, &product)
        .await
        .tag("PRODUCTS_POST")?;
    tracing::info!(product_id = %product.product.id, "Product created");
    Ok(Json(product))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath((store_id, product_id)): AppPath<(StoreId, ProductId)>,
) -> Result<Json<Option<ProductDetail>>, AppError> {
    let product = state
        .datastore()
        .get_product(store_id, product_id)
        .await
        .tag("PRODUCT_GET")?;
    Ok(Json(product))
}

/// Update a product. The image list is replaced wholesale.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, product_id = %product_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, product_id)): AppPath<(StoreId, ProductId)>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<Json<ProductWithImages>, AppError> {
    let product = NewProduct::try_from(input)?;
    authorize(&state, &principal, store_id)
        .await
        .tag("PRODUCT_PATCH")?;

    let product = state
        .datastore()
        .update_product(store_id, product_id, &product)
        .await
        .tag("PRODUCT_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, product_id = %product_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, product_id)): AppPath<(StoreId, ProductId)>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("PRODUCT_DELETE")?;

    let count = state
        .datastore()
        .delete_product(store_id, product_id)
        .await
        .tag("PRODUCT_DELETE")?;
    Ok(Json(DeleteResult { count }))
}
