//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                                   - Liveness
//! GET    /health/ready                             - Database reachable
//!
//! # Stores (owner only)
//! GET    /api/stores                               - Caller's stores
//! POST   /api/stores                               - Create store
//! GET    /api/stores/{store_id}                    - Store, or null
//! PATCH  /api/stores/{store_id}                    - Rename store
//! DELETE /api/stores/{store_id}                    - Delete store and everything in it
//!
//! # Resources (billboards, categories, colors, sizes, products)
//! GET    /api/{store_id}/{resource}                - List (public)
//! POST   /api/{store_id}/{resource}                - Create (owner)
//! GET    /api/{store_id}/{resource}/{id}           - Get, or null (public)
//! PATCH  /api/{store_id}/{resource}/{id}           - Update (owner)
//! DELETE /api/{store_id}/{resource}/{id}           - Delete (owner)
//!
//! # Checkout (public, CORS)
//! POST   /api/{store_id}/checkout                  - Open hosted checkout
//! OPTIONS /api/{store_id}/checkout                 - Preflight
//! ```

pub mod api;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new().merge(health::router()).merge(api::router())
}
