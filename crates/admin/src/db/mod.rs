//! Data access for the store admin.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `store` - Tenant root, owned by an identity-provider user
//! - `billboard` - Hero banners referenced by categories
//! - `category` - Product categories (reference a billboard)
//! - `color` / `size` - Product attributes
//! - `product` - Catalog entries (reference category, size and color)
//! - `image` - Product photos, cascade with their product
//! - `order` / `order_item` - Checkout orders, items cascade with their order
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p shopdeck-cli -- migrate
//! ```
//!
//! Handlers never touch the pool directly; they go through the [`Datastore`]
//! handle held by [`crate::state::AppState`].

pub mod billboards;
pub mod categories;
pub mod colors;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod orders;
pub mod postgres;
pub mod products;
pub mod sizes;
pub mod stores;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopdeck_core::{
    Billboard, BillboardId, BillboardInput, Category, CategoryId, CategoryWithBillboard, Color, ColorId,
    ColorInput, NewCategory, NewProduct, Order, Product, ProductDetail, ProductId, ProductQuery,
    ProductWithImages, Size, SizeId, SizeInput, Store, StoreId, StoreInput, UserId,
};

pub use billboards::BillboardRepository;
pub use categories::CategoryRepository;
pub use colors::ColorRepository;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryDatastore;
pub use orders::OrderRepository;
pub use postgres::PgDatastore;
pub use products::ProductRepository;
pub use sizes::SizeRepository;
pub use stores::StoreRepository;

/// `PostgreSQL` SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// `PostgreSQL` SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (a referenced row is missing, or a row is still
    /// referenced by another).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_error) = error.as_database_error() {
            let code = db_error.code();
            if matches!(
                code.as_deref(),
                Some(FOREIGN_KEY_VIOLATION | UNIQUE_VIOLATION)
            ) {
                let constraint = db_error.constraint().unwrap_or("unknown").to_owned();
                return Self::Conflict(constraint);
            }
        }
        Self::Database(error)
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
/// * `acquire_timeout` - How long to wait for a free connection
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(acquire_timeout)
        .connect(database_url.expose_secret())
        .await
}

/// The data-access handle injected into every handler.
///
/// Reads of child resources are scoped to a store; mutations take the store
/// id the caller was authorized against, so a row of another store is never
/// touched even if its id is known. Updates return `Ok(None)` and deletes
/// return a zero count when nothing in the store matched.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Round-trip to the backing store (readiness check).
    async fn ping(&self) -> Result<(), RepositoryError>;

    // -------------------------------------------------------------------------
    // Stores
    // -------------------------------------------------------------------------

    async fn create_store(&self, owner: &UserId, input: &StoreInput)
    -> Result<Store, RepositoryError>;
    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError>;
    async fn find_owned_store(
        &self,
        id: StoreId,
        owner: &UserId,
    ) -> Result<Option<Store>, RepositoryError>;
    async fn update_store(
        &self,
        id: StoreId,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Option<Store>, RepositoryError>;
    async fn delete_store(&self, id: StoreId, owner: &UserId) -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Billboards
    // -------------------------------------------------------------------------

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError>;
    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError>;
    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError>;
    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError>;
    async fn delete_billboard(&self, store: StoreId, id: BillboardId)
    -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryWithBillboard>, RepositoryError>;
    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError>;
    async fn create_category(
        &self,
        store: StoreId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError>;
    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Option<Category>, RepositoryError>;
    async fn delete_category(&self, store: StoreId, id: CategoryId)
    -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Colors
    // -------------------------------------------------------------------------

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError>;
    async fn get_color(&self, store: StoreId, id: ColorId)
    -> Result<Option<Color>, RepositoryError>;
    async fn create_color(&self, store: StoreId, input: &ColorInput)
    -> Result<Color, RepositoryError>;
    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError>;
    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Sizes
    // -------------------------------------------------------------------------

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError>;
    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError>;
    async fn create_size(&self, store: StoreId, input: &SizeInput) -> Result<Size, RepositoryError>;
    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError>;
    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Non-archived products matching `query`, newest first.
    async fn list_products(
        &self,
        store: StoreId,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDetail>, RepositoryError>;
    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError>;
    async fn create_product(
        &self,
        store: StoreId,
        input: &NewProduct,
    ) -> Result<ProductWithImages, RepositoryError>;
    /// Update a product, replacing its images wholesale.
    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Option<ProductWithImages>, RepositoryError>;
    async fn delete_product(&self, store: StoreId, id: ProductId) -> Result<u64, RepositoryError>;

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Products of `store` whose id is in `ids`. Unknown ids are skipped.
    async fn find_products(
        &self,
        store: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError>;
    /// Create an unpaid order with one item per product, atomically.
    async fn create_order(
        &self,
        store: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError>;
}
