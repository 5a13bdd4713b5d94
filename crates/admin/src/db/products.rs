//! Product repository.
//!
//! Products own an ordered list of images. Creating or updating a product
//! writes the product row and its images in one transaction; an update
//! replaces the image list wholesale. Reads expand category, size and color
//! in a single join and fetch images in one follow-up query.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use shopdeck_core::{
    BillboardId, Category, CategoryId, Color, ColorId, Image, ImageId, NewProduct, Product,
    ProductDetail, ProductId, ProductQuery, ProductWithImages, Size, SizeId, StoreId,
};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    store_id: Uuid,
    category_id: Uuid,
    size_id: Uuid,
    color_id: Uuid,
    name: String,
    price: Decimal,
    is_featured: bool,
    is_archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            store_id: StoreId::new(row.store_id),
            category_id: CategoryId::new(row.category_id),
            size_id: SizeId::new(row.size_id),
            color_id: ColorId::new(row.color_id),
            name: row.name,
            price: row.price,
            is_featured: row.is_featured,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ImageRow {
    id: Uuid,
    product_id: Uuid,
    url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ImageRow> for Image {
    fn from(row: ImageRow) -> Self {
        Self {
            id: ImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            url: row.url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Product joined with category (`c_`), size (`s_`) and color (`co_`).
#[derive(Debug, sqlx::FromRow)]
struct ProductDetailRow {
    #[sqlx(flatten)]
    product: ProductRow,
    c_store_id: Uuid,
    c_billboard_id: Uuid,
    c_name: String,
    c_created_at: DateTime<Utc>,
    c_updated_at: DateTime<Utc>,
    s_store_id: Uuid,
    s_name: String,
    s_value: String,
    s_created_at: DateTime<Utc>,
    s_updated_at: DateTime<Utc>,
    co_store_id: Uuid,
    co_name: String,
    co_value: String,
    co_created_at: DateTime<Utc>,
    co_updated_at: DateTime<Utc>,
}

impl ProductDetailRow {
    fn into_detail(self, images: Vec<Image>) -> ProductDetail {
        let product = Product::from(self.product);
        ProductDetail {
            category: Category {
                id: product.category_id,
                store_id: StoreId::new(self.c_store_id),
                billboard_id: BillboardId::new(self.c_billboard_id),
                name: self.c_name,
                created_at: self.c_created_at,
                updated_at: self.c_updated_at,
            },
            size: Size {
                id: product.size_id,
                store_id: StoreId::new(self.s_store_id),
                name: self.s_name,
                value: self.s_value,
                created_at: self.s_created_at,
                updated_at: self.s_updated_at,
            },
            color: Color {
                id: product.color_id,
                store_id: StoreId::new(self.co_store_id),
                name: self.co_name,
                value: self.co_value,
                created_at: self.co_created_at,
                updated_at: self.co_updated_at,
            },
            images,
            product,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, store_id, category_id, size_id, color_id, name, price, \
                               is_featured, is_archived, created_at, updated_at";

const SELECT_DETAIL: &str = r"
    SELECT p.id, p.store_id, p.category_id, p.size_id, p.color_id, p.name, p.price,
           p.is_featured, p.is_archived, p.created_at, p.updated_at,
           c.store_id AS c_store_id, c.billboard_id AS c_billboard_id, c.name AS c_name,
           c.created_at AS c_created_at, c.updated_at AS c_updated_at,
           s.store_id AS s_store_id, s.name AS s_name, s.value AS s_value,
           s.created_at AS s_created_at, s.updated_at AS s_updated_at,
           co.store_id AS co_store_id, co.name AS co_name, co.value AS co_value,
           co.created_at AS co_created_at, co.updated_at AS co_updated_at
    FROM shop.product p
    JOIN shop.category c ON c.id = p.category_id
    JOIN shop.size s ON s.id = p.size_id
    JOIN shop.color co ON co.id = p.color_id
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's non-archived products matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        store: StoreId,
        query: &ProductQuery,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let sql = format!(
            "{SELECT_DETAIL}
             WHERE p.store_id = $1
               AND p.is_archived = FALSE
               AND ($2::uuid IS NULL OR p.category_id = $2)
               AND ($3::uuid IS NULL OR p.color_id = $3)
               AND ($4::uuid IS NULL OR p.size_id = $4)
               AND ($5::boolean IS NULL OR p.is_featured = $5)
             ORDER BY p.created_at DESC"
        );
        let rows = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(store)
            .bind(query.category_id)
            .bind(query.color_id)
            .bind(query.size_id)
            .bind(query.is_featured)
            .fetch_all(self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.product.id).collect();
        let mut images = self.images_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_images = images.remove(&row.product.id).unwrap_or_default();
                row.into_detail(product_images)
            })
            .collect())
    }

    /// Get a product of `store` with every relation expanded.
    ///
    /// Archived products are still returned here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: ProductId,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let sql = format!("{SELECT_DETAIL} WHERE p.id = $1 AND p.store_id = $2");
        let Some(row) = sqlx::query_as::<_, ProductDetailRow>(&sql)
            .bind(id)
            .bind(store)
            .fetch_optional(self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut images = self.images_for(&[row.product.id]).await?;
        let product_images = images.remove(&row.product.id).unwrap_or_default();
        Ok(Some(row.into_detail(product_images)))
    }

    /// Create a product and its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category, size or color
    /// is not in `store`.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    pub async fn create(
        &self,
        store: StoreId,
        input: &NewProduct,
    ) -> Result<ProductWithImages, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO shop.product
                 (store_id, category_id, size_id, color_id, name, price, is_featured, is_archived)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store)
            .bind(input.category_id)
            .bind(input.size_id)
            .bind(input.color_id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.is_featured)
            .bind(input.is_archived)
            .fetch_one(&mut *tx)
            .await?;

        let images = insert_images(&mut tx, row.id, &input.images).await?;
        tx.commit().await?;

        Ok(ProductWithImages {
            product: row.into(),
            images,
        })
    }

    /// Update a product of `store`, replacing its images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category, size or color
    /// is not in `store`.
    /// Returns `RepositoryError::Database` if the update fails otherwise.
    pub async fn update(
        &self,
        store: StoreId,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Option<ProductWithImages>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE shop.product
             SET category_id = $3, size_id = $4, color_id = $5, name = $6, price = $7,
                 is_featured = $8, is_archived = $9, updated_at = NOW()
             WHERE id = $1 AND store_id = $2
             RETURNING {PRODUCT_COLUMNS}"
        );
        let Some(row) = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(store)
            .bind(input.category_id)
            .bind(input.size_id)
            .bind(input.color_id)
            .bind(&input.name)
            .bind(input.price)
            .bind(input.is_featured)
            .bind(input.is_archived)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM shop.image WHERE product_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        let images = insert_images(&mut tx, row.id, &input.images).await?;
        tx.commit().await?;

        Ok(Some(ProductWithImages {
            product: row.into(),
            images,
        }))
    }

    /// Delete a product of `store`; its images go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an order item references it.
    /// Returns `RepositoryError::Database` if the delete fails otherwise.
    pub async fn delete(&self, store: StoreId, id: ProductId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Products of `store` whose id is in `ids`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_many(
        &self,
        store: StoreId,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let ids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE store_id = $1 AND id = ANY($2)"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(store)
            .bind(&ids)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn images_for(
        &self,
        product_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Image>>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ImageRow>(
            r"
            SELECT id, product_id, url, created_at, updated_at
            FROM shop.image
            WHERE product_id = ANY($1)
            ORDER BY position ASC, created_at ASC
            ",
        )
        .bind(product_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Image>> = HashMap::new();
        for row in rows {
            grouped.entry(row.product_id).or_default().push(row.into());
        }
        Ok(grouped)
    }
}

async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    urls: &[String],
) -> Result<Vec<Image>, RepositoryError> {
    let mut images = Vec::with_capacity(urls.len());
    for (position, url) in (0_i32..).zip(urls) {
        let row = sqlx::query_as::<_, ImageRow>(
            r"
            INSERT INTO shop.image (product_id, url, position)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, url, created_at, updated_at
            ",
        )
        .bind(product_id)
        .bind(url)
        .bind(position)
        .fetch_one(&mut **tx)
        .await?;
        images.push(row.into());
    }
    Ok(images)
}
