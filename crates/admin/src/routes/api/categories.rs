//! Category handlers.
//!
//! Reads expand the category's billboard so the storefront can render the
//! category page header without a second request.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{
    Category, CategoryId, CategoryInput, CategoryWithBillboard, DeleteResult, NewCategory, StoreId,
};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/categories", get(list).post(create))
        .route(
            "/api/{store_id}/categories/{category_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<Vec<CategoryWithBillboard>>, AppError> {
    let categories = state
        .datastore()
        .list_categories(store_id)
        .await
        .tag("CATEGORIES_GET")?;
    Ok(Json(categories))
}

/// Create a category.
///
/// # Errors
///
/// 400 when the name or billboard id is missing. A billboard id that is not
/// in this store fails at the database and surfaces as 500.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Json<Category>, AppError> {
    let category = NewCategory::try_from(input)?;
    authorize(&state, &principal, store_id)
        .await
        .tag("CATEGORIES_POST")?;

    let category = state
        .datastore()
        .create_category(store_id, &category)
        .await
        .tag("CATEGORIES_POST")?;
    Ok(Json(category))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath((store_id, category_id)): AppPath<(StoreId, CategoryId)>,
) -> Result<Json<Option<CategoryWithBillboard>>, AppError> {
    let category = state
        .datastore()
        .get_category(store_id, category_id)
        .await
        .tag("CATEGORY_GET")?;
    Ok(Json(category))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, category_id = %category_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, category_id)): AppPath<(StoreId, CategoryId)>,
    AppJson(input): AppJson<CategoryInput>,
) -> Result<Json<Category>, AppError> {
    let category = NewCategory::try_from(input)?;
    authorize(&state, &principal, store_id)
        .await
        .tag("CATEGORY_PATCH")?;

    let category = state
        .datastore()
        .update_category(store_id, category_id, &category)
        .await
        .tag("CATEGORY_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(category))
}

/// Delete a category.
///
/// Fails while any product is filed under it.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, category_id = %category_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, category_id)): AppPath<(StoreId, CategoryId)>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("CATEGORY_DELETE")?;

    let count = state
        .datastore()
        .delete_category(store_id, category_id)
        .await
        .tag("CATEGORY_DELETE")?;
    Ok(Json(DeleteResult { count }))
}
