//! Billboard handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{Billboard, BillboardId, BillboardInput, DeleteResult, StoreId, Validate};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/billboards", get(list).post(create))
        .route(
            "/api/{store_id}/billboards/{billboard_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<Vec<Billboard>>, AppError> {
    let billboards = state
        .datastore()
        .list_billboards(store_id)
        .await
        .tag("BILLBOARDS_GET")?;
    Ok(Json(billboards))
}

/// Create a billboard in the caller's store.
///
/// # Errors
///
/// 401 without a credential, 400 when label or image URL is blank,
/// 403 when the caller does not own the store.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<BillboardInput>,
) -> Result<Json<Billboard>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("BILLBOARDS_POST")?;

    let billboard = state
        .datastore()
        .create_billboard(store_id, &input)
        .await
        .tag("BILLBOARDS_POST")?;
    Ok(Json(billboard))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath((store_id, billboard_id)): AppPath<(StoreId, BillboardId)>,
) -> Result<Json<Option<Billboard>>, AppError> {
    let billboard = state
        .datastore()
        .get_billboard(store_id, billboard_id)
        .await
        .tag("BILLBOARD_GET")?;
    Ok(Json(billboard))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, billboard_id = %billboard_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, billboard_id)): AppPath<(StoreId, BillboardId)>,
    AppJson(input): AppJson<BillboardInput>,
) -> Result<Json<Billboard>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("BILLBOARD_PATCH")?;

    let billboard = state
        .datastore()
        .update_billboard(store_id, billboard_id, &input)
        .await
        .tag("BILLBOARD_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(billboard))
}

/// Delete a billboard.
///
/// Fails while any category still points at it.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, billboard_id = %billboard_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, billboard_id)): AppPath<(StoreId, BillboardId)>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("BILLBOARD_DELETE")?;

    let count = state
        .datastore()
        .delete_billboard(store_id, billboard_id)
        .await
        .tag("BILLBOARD_DELETE")?;
    Ok(Json(DeleteResult { count }))
}
