//! `PostgreSQL`-backed [`Datastore`].

use async_trait::async_trait;
use sqlx::PgPool;

use shopdeck_core::{
    Billboard, BillboardId, BillboardInput, Category, CategoryId, CategoryWithBillboard, Color,
    ColorId, ColorInput, NewCategory, NewProduct, Order, Product, ProductDetail, ProductId,
    ProductQuery, ProductWithImages, Size, SizeId, SizeInput, Store, StoreId, StoreInput, UserId,
};

use super::{
    BillboardRepository, CategoryRepository, ColorRepository, Datastore, OrderRepository,
    ProductRepository, RepositoryError, SizeRepository, StoreRepository,
};

/// Datastore over a shared connection pool.
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_store(
        &self,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Store, RepositoryError> {
        StoreRepository::new(&self.pool).create(owner, input).await
    }

    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).list_owned(owner).await
    }

    async fn find_owned_store(
        &self,
        id: StoreId,
        owner: &UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).get_owned(id, owner).await
    }

    async fn update_store(
        &self,
        id: StoreId,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Option<Store>, RepositoryError> {
        StoreRepository::new(&self.pool).update(id, owner, input).await
    }

    async fn delete_store(&self, id: StoreId, owner: &UserId) -> Result<u64, RepositoryError> {
        StoreRepository::new(&self.pool).delete(id, owner).await
    }

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).list(store).await
    }

    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool).get(store, id).await
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        BillboardRepository::new(&self.pool).create(store, input).await
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        BillboardRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<u64, RepositoryError> {
        BillboardRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryWithBillboard>, RepositoryError> {
        CategoryRepository::new(&self.pool).list(store).await
    }

    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        CategoryRepository::new(&self.pool).get(store, id).await
    }

    async fn create_category(
        &self,
        store: StoreId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        CategoryRepository::new(&self.pool).create(store, input).await
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<u64, RepositoryError> {
        CategoryRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).list(store).await
    }

    async fn get_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).get(store, id).await
    }

    async fn create_color(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        ColorRepository::new(&self.pool).create(store, input).await
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        ColorRepository::new(&self.pool).update(store, id, input).await
    }

    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<u64, RepositoryError> {
        ColorRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).list(store).await
    }

    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).get(store, id).await
    }

    async fn create_size(&self, store: StoreId, input: &SizeInput) -> Result<Size, RepositoryError> {
        SizeRepository::new(&self.pool).create(store, input).await
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError> {
        SizeRepository::new(&self.pool).update(store, id, input).await
    }

    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<u64, RepositoryError> {
        SizeRepository::new(&self.pool).delete(store, id).await
    }

    async fn list_products(
        &self,
        store: StoreId,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        ProductRepository::new(&self.pool).list(store, query).await
    }

    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        ProductRepository::new(&self.pool).get(store, id).await
    }

    async fn create_product(
        &self,
        store: StoreId,
        input: &NewProduct,
    ) -> Result<ProductWithImages, RepositoryError> {
        ProductRepository::new(&self.pool).create(store, input).await
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Option<ProductWithImages>, RepositoryError> {
        ProductRepository::new(&self.pool)
            .update(store, id, input)
            .await
    }

    async fn delete_product(&self, store: StoreId, id: ProductId) -> Result<u64, RepositoryError> {
        ProductRepository::new(&self.pool).delete(store, id).await
    }

    async fn find_products(
        &self,
        store: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        ProductRepository::new(&self.pool).find_many(store, ids).await
    }

    async fn create_order(
        &self,
        store: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError> {
        OrderRepository::new(&self.pool)
            .create(store, product_ids)
            .await
    }
}
