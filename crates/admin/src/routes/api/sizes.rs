//! Size handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{DeleteResult, Size, SizeId, SizeInput, StoreId, Validate};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/sizes", get(list).post(create))
        .route(
            "/api/{store_id}/sizes/{size_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<Vec<Size>>, AppError> {
    let sizes = state
        .datastore()
        .list_sizes(store_id)
        .await
        .tag("SIZES_GET")?;
    Ok(Json(sizes))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<SizeInput>,
) -> Result<Json<Size>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("SIZES_POST")?;

    let size = state
        .datastore()
        .create_size(store_id, &input)
        .await
        .tag("SIZES_POST")?;
    Ok(Json(size))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath((store_id, size_id)): AppPath<(StoreId, SizeId)>,
) -> Result<Json<Option<Size>>, AppError> {
    let size = state
        .datastore()
        .get_size(store_id, size_id)
        .await
        .tag("SIZE_GET")?;
    Ok(Json(size))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, size_id = %size_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, size_id)): AppPath<(StoreId, SizeId)>,
    AppJson(input): AppJson<SizeInput>,
) -> Result<Json<Size>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("SIZE_PATCH")?;

    let size = state
        .datastore()
        .update_size(store_id, size_id, &input)
        .await
        .tag("SIZE_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(size))
}

/// Delete a size.
///
/// Fails while any product uses it.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, size_id = %size_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, size_id)): AppPath<(StoreId, SizeId)>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("SIZE_DELETE")?;

    let count = state
        .datastore()
        .delete_size(store_id, size_id)
        .await
        .tag("SIZE_DELETE")?;
    Ok(Json(DeleteResult { count }))
}
