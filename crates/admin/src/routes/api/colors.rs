//! Color handlers.

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::instrument;

use shopdeck_core::{Color, ColorId, ColorInput, DeleteResult, StoreId, Validate};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath, RequireUser},
    state::AppState,
};

use super::authorize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/colors", get(list).post(create))
        .route(
            "/api/{store_id}/colors/{color_id}",
            get(show).patch(update).delete(destroy),
        )
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
) -> Result<Json<Vec<Color>>, AppError> {
    let colors = state
        .datastore()
        .list_colors(store_id)
        .await
        .tag("COLORS_GET")?;
    Ok(Json(colors))
}

/// Create a color.
///
/// # Errors
///
/// 400 when the name is blank or the value is not a `#`-prefixed hex code
/// of at least four characters.
#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id))]
async fn create(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<ColorInput>,
) -> Result<Json<Color>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("COLORS_POST")?;

    let color = state
        .datastore()
        .create_color(store_id, &input)
        .await
        .tag("COLORS_POST")?;
    Ok(Json(color))
}

#[instrument(skip(state))]
async fn show(
    State(state): State<AppState>,
    AppPath((store_id, color_id)): AppPath<(StoreId, ColorId)>,
) -> Result<Json<Option<Color>>, AppError> {
    let color = state
        .datastore()
        .get_color(store_id, color_id)
        .await
        .tag("COLOR_GET")?;
    Ok(Json(color))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, color_id = %color_id))]
async fn update(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, color_id)): AppPath<(StoreId, ColorId)>,
    AppJson(input): AppJson<ColorInput>,
) -> Result<Json<Color>, AppError> {
    input.validate()?;
    authorize(&state, &principal, store_id)
        .await
        .tag("COLOR_PATCH")?;

    let color = state
        .datastore()
        .update_color(store_id, color_id, &input)
        .await
        .tag("COLOR_PATCH")?
        .ok_or(AppError::NotFound)?;
    Ok(Json(color))
}

#[instrument(skip_all, fields(user_id = %principal.user_id, store_id = %store_id, color_id = %color_id))]
async fn destroy(
    RequireUser(principal): RequireUser,
    State(state): State<AppState>,
    AppPath((store_id, color_id)): AppPath<(StoreId, ColorId)>,
) -> Result<Json<DeleteResult>, AppError> {
    authorize(&state, &principal, store_id)
        .await
        .tag("COLOR_DELETE")?;

    let count = state
        .datastore()
        .delete_color(store_id, color_id)
        .await
        .tag("COLOR_DELETE")?;
    Ok(Json(DeleteResult { count }))
}
