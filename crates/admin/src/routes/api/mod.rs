//! JSON API handlers.
//!
//! Every mutating handler runs the same stages in order: authenticate
//! (the [`RequireUser`](crate::middleware::RequireUser) extractor), validate
//! the payload, check the caller owns the store, then make a single
//! datastore call.

pub mod billboards;
pub mod categories;
pub mod checkout;
pub mod colors;
pub mod products;
pub mod sizes;
pub mod stores;

use axum::Router;

use shopdeck_core::{Store, StoreId};

use crate::{error::AppError, services::Principal, state::AppState};

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(stores::router())
        .merge(billboards::router())
        .merge(categories::router())
        .merge(colors::router())
        .merge(sizes::router())
        .merge(products::router())
        .merge(checkout::router())
}

/// Load the store if the caller owns it.
///
/// # Errors
///
/// Returns `AppError::Forbidden` if the store does not exist or belongs to
/// someone else, `AppError::Database` if the lookup fails.
pub async fn authorize(
    state: &AppState,
    principal: &Principal,
    store_id: StoreId,
) -> Result<Store, AppError> {
    state
        .datastore()
        .find_owned_store(store_id, &principal.user_id)
        .await?
        .ok_or(AppError::Forbidden)
}
