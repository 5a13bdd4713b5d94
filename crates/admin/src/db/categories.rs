//! Category repository.
//!
//! Reads expand the category's billboard in the same query.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdeck_core::{
    Billboard, BillboardId, Category, CategoryId, CategoryWithBillboard, NewCategory, StoreId,
};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    store_id: Uuid,
    billboard_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            store_id: StoreId::new(row.store_id),
            billboard_id: BillboardId::new(row.billboard_id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Category joined with its billboard; billboard columns are `b_` prefixed.
#[derive(Debug, sqlx::FromRow)]
struct CategoryWithBillboardRow {
    id: Uuid,
    store_id: Uuid,
    billboard_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    b_label: String,
    b_image_url: String,
    b_store_id: Uuid,
    b_created_at: DateTime<Utc>,
    b_updated_at: DateTime<Utc>,
}

impl From<CategoryWithBillboardRow> for CategoryWithBillboard {
    fn from(row: CategoryWithBillboardRow) -> Self {
        Self {
            billboard: Billboard {
                id: BillboardId::new(row.billboard_id),
                store_id: StoreId::new(row.b_store_id),
                label: row.b_label,
                image_url: row.b_image_url,
                created_at: row.b_created_at,
                updated_at: row.b_updated_at,
            },
            category: Category {
                id: CategoryId::new(row.id),
                store_id: StoreId::new(row.store_id),
                billboard_id: BillboardId::new(row.billboard_id),
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const SELECT_WITH_BILLBOARD: &str = r"
    SELECT c.id, c.store_id, c.billboard_id, c.name, c.created_at, c.updated_at,
           b.label AS b_label, b.image_url AS b_image_url, b.store_id AS b_store_id,
           b.created_at AS b_created_at, b.updated_at AS b_updated_at
    FROM shop.category c
    JOIN shop.billboard b ON b.id = c.billboard_id
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's categories with their billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<CategoryWithBillboard>, RepositoryError> {
        let sql = format!("{SELECT_WITH_BILLBOARD} WHERE c.store_id = $1 ORDER BY c.created_at DESC");
        let rows = sqlx::query_as::<_, CategoryWithBillboardRow>(&sql)
            .bind(store)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a category of `store` with its billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: CategoryId,
    ) -> Result<Option<CategoryWithBillboard>, RepositoryError> {
        let sql = format!("{SELECT_WITH_BILLBOARD} WHERE c.id = $1 AND c.store_id = $2");
        let row = sqlx::query_as::<_, CategoryWithBillboardRow>(&sql)
            .bind(id)
            .bind(store)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the billboard is not in `store`.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    pub async fn create(
        &self,
        store: StoreId,
        input: &NewCategory,
    ) -> Result<Category, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            INSERT INTO shop.category (store_id, billboard_id, name)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, billboard_id, name, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a category of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the billboard is not in `store`.
    /// Returns `RepositoryError::Database` if the update fails otherwise.
    pub async fn update(
        &self,
        store: StoreId,
        id: CategoryId,
        input: &NewCategory,
    ) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r"
            UPDATE shop.category
            SET name = $3, billboard_id = $4, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, billboard_id, name, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(input.billboard_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a category of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product still uses it.
    /// Returns `RepositoryError::Database` if the delete fails otherwise.
    pub async fn delete(&self, store: StoreId, id: CategoryId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.category WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
