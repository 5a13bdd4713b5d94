//! Store handlers.
//!
//! Stores are private to their owner: unlike the other resources, even
//! reads need a credential.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{DeleteResult, Store, StoreId, StoreInput, Validate};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stores", get(list).post(create))
        .route(
            "/api/stores/{store_id}",
            get(show).patch(update).delete(destroy),
        )
}

/// List the caller's stores, oldest first.
#[instrument(skip_all, fields(user_id = %principal.user_id))]
async fn list(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = state
        .datastore()
        .list_stores(&principal.user_id)
        .await
        .tag("STORES_GET")?;
    Ok(Json(stores))
}

/// Create a store owned by the caller.
///
/// # Errors
///
/// 400 when the name is blank, 500 when the insert fails.
#[instrument(skip_all, fields(user_id = %principal.user_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<StoreInput>,
) -> Result<Json<Store>, AppError> {
    input.validate()?;

    let store = state
        .datastore()
        .create_store(&principal.user_id, &input)
        .await
        .tag("STORES_POST")?;
    tracing::info!(store_id = %store.id, "Store created");
    Ok(Json(store))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn show(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<Option<Store>>, AppError> {
    let store = state
        .datastore()
        .find_owned_store(store_id, &principal.user_id)
        .await
        .tag("STORE_GET")?;
    Ok(Json(store))
}

/// Rename a store.
///
/// # Errors
///
/// 400 when the name is blank, 403 when the caller does not own the store.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<StoreInput>,
) -> Result<Json<Store>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("STORE_PATCH")?;

    let store = state
        .datastore()
        .update_store(store_id, &principal.user_id, &input)
        .await
        .tag("STORE_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(store))
}

/// Delete a store. Everything inside it goes with it.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("STORE_DELETE")?;

    let count = state
        .datastore()
        .delete_store(store_id, &principal.user_id)
        .await
        .tag("STORE_DELETE")?;
    tracing::info!(count, "Store deleted");
    Ok(Json(DeleteResult { count }))
}
