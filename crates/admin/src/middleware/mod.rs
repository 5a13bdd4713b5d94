//! Request extractors for the admin API.
//!
//! Authentication is per handler rather than a blanket layer: list and get
//! routes are public because the storefront reads them.

pub mod auth;
pub mod extract;

pub use auth::{RequireUser, SESSION_COOKIE};
pub use extract::{AppJson, AppPath, AppQuery};
