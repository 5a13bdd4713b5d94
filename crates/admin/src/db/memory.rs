//! In-memory [`Datastore`] for tests and local runs without `PostgreSQL`.
//!
//! Mirrors the referential rules of the SQL schema. A reference must name a
//! row of the same store, and deleting a row that is still referenced fails;
//! both surface as [`RepositoryError::Conflict`]. Deleting a store cascades
//! to all of its rows.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use shopdeck_core::{
    Billboard, BillboardId, BillboardInput, Category, CategoryId, CategoryWithBillboard, Color,
    ColorId, ColorInput, Image, ImageId, NewCategory, NewProduct, Order, OrderId, OrderItem,
    OrderItemId, Product, ProductDetail, ProductId, ProductQuery, ProductWithImages, Size, SizeId,
    SizeInput, Store, StoreId, StoreInput, UserId,
};

use super::{Datastore, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    stores: Vec<Store>,
    billboards: Vec<Billboard>,
    categories: Vec<Category>,
    colors: Vec<Color>,
    sizes: Vec<Size>,
    products: Vec<Product>,
    images: Vec<Image>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

impl Tables {
    fn images_of(&self, product: ProductId) -> Vec<Image> {
        self.images
            .iter()
            .filter(|image| image.product_id == product)
            .cloned()
            .collect()
    }

    fn detail(&self, product: &Product) -> Result<ProductDetail, RepositoryError> {
        let category = self
            .categories
            .iter()
            .find(|c| c.id == product.category_id)
            .cloned()
            .ok_or_else(|| corruption("product category"))?;
        let size = self
            .sizes
            .iter()
            .find(|s| s.id == product.size_id)
            .cloned()
            .ok_or_else(|| corruption("product size"))?;
        let color = self
            .colors
            .iter()
            .find(|c| c.id == product.color_id)
            .cloned()
            .ok_or_else(|| corruption("product color"))?;

        Ok(ProductDetail {
            product: product.clone(),
            images: self.images_of(product.id),
            category,
            size,
            color,
        })
    }

    fn with_billboard(&self, category: &Category) -> Result<CategoryWithBillboard, RepositoryError> {
        let billboard = self
            .billboards
            .iter()
            .find(|b| b.id == category.billboard_id)
            .cloned()
            .ok_or_else(|| corruption("category billboard"))?;
        Ok(CategoryWithBillboard {
            category: category.clone(),
            billboard,
        })
    }

    fn check_billboard_ref(
        &self,
        store: StoreId,
        billboard: BillboardId,
    ) -> Result<(), RepositoryError> {
        if self
            .billboards
            .iter()
            .any(|b| b.id == billboard && b.store_id == store)
        {
            Ok(())
        } else {
            Err(conflict("category_billboard_id_fkey"))
        }
    }

    fn check_product_refs(&self, store: StoreId, input: &NewProduct) -> Result<(), RepositoryError> {
        if !self
            .categories
            .iter()
            .any(|c| c.id == input.category_id && c.store_id == store)
        {
            return Err(conflict("product_category_id_fkey"));
        }
        if !self
            .sizes
            .iter()
            .any(|s| s.id == input.size_id && s.store_id == store)
        {
            return Err(conflict("product_size_id_fkey"));
        }
        if !self
            .colors
            .iter()
            .any(|c| c.id == input.color_id && c.store_id == store)
        {
            return Err(conflict("product_color_id_fkey"));
        }
        Ok(())
    }

    fn replace_images(&mut self, product: ProductId, urls: &[String]) -> Vec<Image> {
        self.images.retain(|image| image.product_id != product);
        let now = Utc::now();
        let images: Vec<Image> = urls
            .iter()
            .map(|url| Image {
                id: ImageId::generate(),
                product_id: product,
                url: url.clone(),
                created_at: now,
                updated_at: now,
            })
            .collect();
        self.images.extend(images.iter().cloned());
        images
    }

    fn remove_store(&mut self, store: StoreId) {
        let order_ids: Vec<OrderId> = self
            .orders
            .iter()
            .filter(|o| o.store_id == store)
            .map(|o| o.id)
            .collect();
        let product_ids: Vec<ProductId> = self
            .products
            .iter()
            .filter(|p| p.store_id == store)
            .map(|p| p.id)
            .collect();

        self.order_items.retain(|item| !order_ids.contains(&item.order_id));
        self.orders.retain(|o| o.store_id != store);
        self.images.retain(|image| !product_ids.contains(&image.product_id));
        self.products.retain(|p| p.store_id != store);
        self.categories.retain(|c| c.store_id != store);
        self.billboards.retain(|b| b.store_id != store);
        self.colors.retain(|c| c.store_id != store);
        self.sizes.retain(|s| s.store_id != store);
        self.stores.retain(|s| s.id != store);
    }
}

fn conflict(constraint: &str) -> RepositoryError {
    RepositoryError::Conflict(constraint.to_owned())
}

fn corruption(what: &str) -> RepositoryError {
    RepositoryError::DataCorruption(format!("dangling {what} reference"))
}

/// Removes the first element matching `pred`, returning the removed count.
fn remove_where<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> u64 {
    rows.iter().position(pred).map_or(0, |index| {
        rows.remove(index);
        1
    })
}

/// A [`Datastore`] that keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryDatastore {
    /// Create an empty datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation fails as if the database were unreachable.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of orders recorded so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the datastore is failing or the lock is poisoned.
    pub fn order_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.tables()?.orders.len())
    }

    /// Items of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the datastore is failing or the lock is poisoned.
    pub fn order_items(&self, order: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        Ok(self
            .tables()?
            .order_items
            .iter()
            .filter(|item| item.order_id == order)
            .cloned()
            .collect())
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        self.tables
            .lock()
            .map_err(|_| RepositoryError::DataCorruption("memory datastore lock poisoned".into()))
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.tables().map(|_| ())
    }

    async fn create_store(
        &self,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Store, RepositoryError> {
        let now = Utc::now();
        let store = Store {
            id: StoreId::generate(),
            name: input.name.clone(),
            user_id: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables()?.stores.push(store.clone());
        Ok(store)
    }

    async fn list_stores(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        Ok(self
            .tables()?
            .stores
            .iter()
            .filter(|s| &s.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_owned_store(
        &self,
        id: StoreId,
        owner: &UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        Ok(self
            .tables()?
            .stores
            .iter()
            .find(|s| s.id == id && &s.user_id == owner)
            .cloned())
    }

    async fn update_store(
        &self,
        id: StoreId,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Option<Store>, RepositoryError> {
        let mut tables = self.tables()?;
        Ok(tables
            .stores
            .iter_mut()
            .find(|s| s.id == id && &s.user_id == owner)
            .map(|store| {
                store.name.clone_from(&input.name);
                store.updated_at = Utc::now();
                store.clone()
            }))
    }

    async fn delete_store(&self, id: StoreId, owner: &UserId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.stores.iter().any(|s| s.id == id && &s.user_id == owner) {
            return Ok(0);
        }
        tables.remove_store(id);
        Ok(1)
    }

    async fn list_billboards(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        Ok(self
            .tables()?
            .billboards
            .iter()
            .rev()
            .filter(|b| b.store_id == store)
            .cloned()
            .collect())
    }

    async fn get_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        Ok(self
            .tables()?
            .billboards
            .iter()
            .find(|b| b.id == id && b.store_id == store)
            .cloned())
    }

    async fn create_billboard(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.stores.iter().any(|s| s.id == store) {
            return Err(conflict("billboard_store_id_fkey"));
        }
        let now = Utc::now();
        let billboard = Billboard {
            id: BillboardId::generate(),
            store_id: store,
            label: input.label.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.billboards.push(billboard.clone());
        Ok(billboard)
    }

    async fn update_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let mut tables = self.tables()?;
        Ok(tables
            .billboards
            .iter_mut()
            .find(|b| b.id == id && b.store_id == store)
            .map(|billboard| {
                billboard.label.clone_from(&input.label);
                billboard.image_url.clone_from(&input.image_url);
                billboard.updated_at = Utc::now();
                billboard.clone()
            }))
    }

    async fn delete_billboard(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .categories
            .iter()
            .any(|c| c.billboard_id == id && c.store_id == store)
        {
            return Err(conflict("category_billboard_id_fkey"));
        }
        Ok(remove_where(&mut tables.billboards, |b| {
            b.id == id && b.store_id == store
        }))
    }

    async fn list_categories(
        &self,
        store: StoreId,
    ) -> Result<Vec<CategoryWithBillboard>, RepositoryError> {
        let tables = self.tables()?;
        tables
            .categories
            .iter()
            .rev()
            .filter(|c| c.store_id == store)
            .map(|c| tables.with_billboard(c))
            .collect()
    }

    async fn get_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        let tables = self.tables()?;
        tables
            .categories
            .iter()
            .find(|c| c.id == id && c.store_id == store)
            .map(|c| tables.with_billboard(c))
            .transpose()
    }

    async fn create_category(
        &self,
        store: StoreId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        let mut tables = self.tables()?;
        tables.check_billboard_ref(store, input.billboard_id)?;
        let now = Utc::now();
        let category = Category {
            id: CategoryId::generate(),
            store_id: store,
            billboard_id: input.billboard_id,
            name: input.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Option<Category>, RepositoryError> {
        let mut tables = self.tables()?;
        tables.check_billboard_ref(store, input.billboard_id)?;
        Ok(tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store)
            .map(|category| {
                category.name.clone_from(&input.name);
                category.billboard_id = input.billboard_id;
                category.updated_at = Utc::now();
                category.clone()
            }))
    }

    async fn delete_category(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .products
            .iter()
            .any(|p| p.category_id == id && p.store_id == store)
        {
            return Err(conflict("product_category_id_fkey"));
        }
        Ok(remove_where(&mut tables.categories, |c| {
            c.id == id && c.store_id == store
        }))
    }

    async fn list_colors(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        Ok(self
            .tables()?
            .colors
            .iter()
            .rev()
            .filter(|c| c.store_id == store)
            .cloned()
            .collect())
    }

    async fn get_color(
        &self,
        store: StoreId,
        id: ColorId,
    ) -> Result<Option<Color>, RepositoryError> {
        Ok(self
            .tables()?
            .colors
            .iter()
            .find(|c| c.id == id && c.store_id == store)
            .cloned())
    }

    async fn create_color(
        &self,
        store: StoreId,
        input: &ColorInput,
    ) -> Result<Color, RepositoryError> {
        let now = Utc::now();
        let color = Color {
            id: ColorId::generate(),
            store_id: store,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables()?.colors.push(color.clone());
        Ok(color)
    }

    async fn update_color(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        let mut tables = self.tables()?;
        Ok(tables
            .colors
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store)
            .map(|color| {
                color.name.clone_from(&input.name);
                color.value.clone_from(&input.value);
                color.updated_at = Utc::now();
                color.clone()
            }))
    }

    async fn delete_color(&self, store: StoreId, id: ColorId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .products
            .iter()
            .any(|p| p.color_id == id && p.store_id == store)
        {
            return Err(conflict("product_color_id_fkey"));
        }
        Ok(remove_where(&mut tables.colors, |c| {
            c.id == id && c.store_id == store
        }))
    }

    async fn list_sizes(&self, store: StoreId) -> Result<Vec<Size>, RepositoryError> {
        Ok(self
            .tables()?
            .sizes
            .iter()
            .rev()
            .filter(|s| s.store_id == store)
            .cloned()
            .collect())
    }

    async fn get_size(&self, store: StoreId, id: SizeId) -> Result<Option<Size>, RepositoryError> {
        Ok(self
            .tables()?
            .sizes
            .iter()
            .find(|s| s.id == id && s.store_id == store)
            .cloned())
    }

    async fn create_size(&self, store: StoreId, input: &SizeInput) -> Result<Size, RepositoryError> {
        let now = Utc::now();
        let size = Size {
            id: SizeId::generate(),
            store_id: store,
            name: input.name.clone(),
            value: input.value.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tables()?.sizes.push(size.clone());
        Ok(size)
    }

    async fn update_size(
        &self,
        store: StoreId,
        id: SizeId,
        input: &SizeInput,
    ) -> Result<Option<Size>, RepositoryError> {
        let mut tables = self.tables()?;
        Ok(tables
            .sizes
            .iter_mut()
            .find(|s| s.id == id && s.store_id == store)
            .map(|size| {
                size.name.clone_from(&input.name);
                size.value.clone_from(&input.value);
                size.updated_at = Utc::now();
                size.clone()
            }))
    }

    async fn delete_size(&self, store: StoreId, id: SizeId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .products
            .iter()
            .any(|p| p.size_id == id && p.store_id == store)
        {
            return Err(conflict("product_size_id_fkey"));
        }
        Ok(remove_where(&mut tables.sizes, |s| {
            s.id == id && s.store_id == store
        }))
    }

    async fn list_products(
        &self,
        store: StoreId,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let tables = self.tables()?;
        tables
            .products
            .iter()
            .rev()
            .filter(|p| p.store_id == store && !p.is_archived)
            .filter(|p| query.category_id.is_none_or(|id| p.category_id == id))
            .filter(|p| query.color_id.is_none_or(|id| p.color_id == id))
            .filter(|p| query.size_id.is_none_or(|id| p.size_id == id))
            .filter(|p| query.is_featured.is_none_or(|featured| p.is_featured == featured))
            .map(|p| tables.detail(p))
            .collect()
    }

    async fn get_product(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let tables = self.tables()?;
        tables
            .products
            .iter()
            .find(|p| p.id == id && p.store_id == store)
            .map(|p| tables.detail(p))
            .transpose()
    }

    async fn create_product(
        &self,
        store: StoreId,
        input: &NewProduct,
    ) -> Result<ProductWithImages, RepositoryError> {
        let mut tables = self.tables()?;
        tables.check_product_refs(store, input)?;
        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            store_id: store,
            category_id: input.category_id,
            size_id: input.size_id,
            color_id: input.color_id,
            name: input.name.clone(),
            price: input.price,
            is_featured: input.is_featured,
            is_archived: input.is_archived,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        let images = tables.replace_images(product.id, &input.images);
        Ok(ProductWithImages { product, images })
    }

    async fn update_product(
        &self,
        store: StoreId,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Option<ProductWithImages>, RepositoryError> {
        let mut tables = self.tables()?;
        tables.check_product_refs(store, input)?;
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.store_id == store)
        else {
            return Ok(None);
        };

        product.category_id = input.category_id;
        product.size_id = input.size_id;
        product.color_id = input.color_id;
        product.name.clone_from(&input.name);
        product.price = input.price;
        product.is_featured = input.is_featured;
        product.is_archived = input.is_archived;
        product.updated_at = Utc::now();
        let product = product.clone();

        let images = tables.replace_images(product.id, &input.images);
        Ok(Some(ProductWithImages { product, images }))
    }

    async fn delete_product(&self, store: StoreId, id: ProductId) -> Result<u64, RepositoryError> {
        let mut tables = self.tables()?;
        if tables.order_items.iter().any(|item| item.product_id == id) {
            return Err(conflict("order_item_product_id_fkey"));
        }
        let removed = remove_where(&mut tables.products, |p| p.id == id && p.store_id == store);
        if removed > 0 {
            tables.images.retain(|image| image.product_id != id);
        }
        Ok(removed)
    }

    async fn find_products(
        &self,
        store: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .tables()?
            .products
            .iter()
            .filter(|p| p.store_id == store && ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn create_order(
        &self,
        store: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(missing) = product_ids
            .iter()
            .find(|id| !tables.products.iter().any(|p| p.id == **id))
        {
            return Err(RepositoryError::Conflict(format!(
                "order_item_product_id_fkey ({missing})"
            )));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            store_id: store,
            is_paid: false,
            phone: String::new(),
            address: String::new(),
            created_at: now,
            updated_at: now,
        };
        tables.orders.push(order.clone());
        for product_id in product_ids {
            tables.order_items.push(OrderItem {
                id: OrderItemId::generate(),
                order_id: order.id,
                product_id: *product_id,
            });
        }
        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    async fn seeded() -> (MemoryDatastore, StoreId, NewProduct) {
        let db = MemoryDatastore::new();
        let owner = UserId::new("user_1");
        let store = db
            .create_store(&owner, &StoreInput { name: "Main".into() })
            .await
            .unwrap();
        let billboard = db
            .create_billboard(
                store.id,
                &BillboardInput {
                    label: "Summer".into(),
                    image_url: "https://cdn.example.com/b.png".into(),
                },
            )
            .await
            .unwrap();
        let category = db
            .create_category(
                store.id,
                &NewCategory {
                    name: "Shirts".into(),
                    billboard_id: billboard.id,
                },
            )
            .await
            .unwrap();
        let size = db
            .create_size(
                store.id,
                &SizeInput {
                    name: "Medium".into(),
                    value: "M".into(),
                },
            )
            .await
            .unwrap();
        let color = db
            .create_color(
                store.id,
                &ColorInput {
                    name: "White".into(),
                    value: "#fff".into(),
                },
            )
            .await
            .unwrap();
        let product = NewProduct {
            name: "Tee".into(),
            price: Decimal::new(1999, 2),
            category_id: category.id,
            size_id: size.id,
            color_id: color.id,
            images: vec!["https://cdn.example.com/1.png".into()],
            is_featured: true,
            is_archived: false,
        };
        (db, store.id, product)
    }

    #[tokio::test]
    async fn test_billboard_delete_blocked_by_category() {
        let (db, store, _) = seeded().await;
        let billboard = db.list_billboards(store).await.unwrap().remove(0);
        let result = db.delete_billboard(store, billboard.id).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert!(db.get_billboard(store, billboard.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_category_cannot_use_other_store_billboard() {
        let (db, store, _) = seeded().await;
        let billboard = db.list_billboards(store).await.unwrap().remove(0);
        let other = db
            .create_store(&UserId::new("user_2"), &StoreInput { name: "Other".into() })
            .await
            .unwrap();

        let result = db
            .create_category(
                other.id,
                &NewCategory {
                    name: "Borrowed".into(),
                    billboard_id: billboard.id,
                },
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert!(db.list_categories(other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_cannot_use_other_store_refs() {
        let (db, _, input) = seeded().await;
        let other = db
            .create_store(&UserId::new("user_2"), &StoreInput { name: "Other".into() })
            .await
            .unwrap();

        let result = db.create_product(other.id, &input).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_product_replaces_images() {
        let (db, store, mut input) = seeded().await;
        let created = db.create_product(store, &input).await.unwrap();
        input.images = vec!["https://cdn.example.com/2.png".into(), "https://cdn.example.com/3.png".into()];
        let updated = db
            .update_product(store, created.product.id, &input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.images.len(), 2);
        let detail = db.get_product(store, created.product.id).await.unwrap().unwrap();
        let urls: Vec<_> = detail.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["https://cdn.example.com/2.png", "https://cdn.example.com/3.png"]);
    }

    #[tokio::test]
    async fn test_list_products_excludes_archived() {
        let (db, store, mut input) = seeded().await;
        db.create_product(store, &input).await.unwrap();
        input.is_archived = true;
        db.create_product(store, &input).await.unwrap();
        let listed = db.list_products(store, &ProductQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].product.is_archived);
    }

    #[tokio::test]
    async fn test_delete_store_cascades() {
        let (db, store, input) = seeded().await;
        db.create_product(store, &input).await.unwrap();
        let count = db.delete_store(store, &UserId::new("user_1")).await.unwrap();
        assert_eq!(count, 1);
        assert!(db.list_billboards(store).await.unwrap().is_empty());
        assert!(db
            .list_products(store, &ProductQuery::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_delete_store_requires_owner() {
        let (db, store, _) = seeded().await;
        let count = db.delete_store(store, &UserId::new("intruder")).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_failing_datastore() {
        let db = MemoryDatastore::new();
        db.set_failing(true);
        assert!(matches!(db.ping().await, Err(RepositoryError::Database(_))));
    }
}
