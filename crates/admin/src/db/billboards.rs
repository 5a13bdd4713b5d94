//! Billboard repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdeck_core::{Billboard, BillboardId, BillboardInput, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct BillboardRow {
    id: Uuid,
    store_id: Uuid,
    label: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BillboardRow> for Billboard {
    fn from(row: BillboardRow) -> Self {
        Self {
            id: BillboardId::new(row.id),
            store_id: StoreId::new(row.store_id),
            label: row.label,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for billboard database operations.
pub struct BillboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BillboardRepository<'a> {
    /// Create a new billboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's billboards, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Billboard>, RepositoryError> {
        let rows = sqlx::query_as::<_, BillboardRow>(
            r"
            SELECT id, store_id, label, image_url, created_at, updated_at
            FROM shop.billboard
            WHERE store_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a billboard of `store` by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        store: StoreId,
        id: BillboardId,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            SELECT id, store_id, label, image_url, created_at, updated_at
            FROM shop.billboard
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a billboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        store: StoreId,
        input: &BillboardInput,
    ) -> Result<Billboard, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            INSERT INTO shop.billboard (store_id, label, image_url)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, label, image_url, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a billboard of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: BillboardId,
        input: &BillboardInput,
    ) -> Result<Option<Billboard>, RepositoryError> {
        let row = sqlx::query_as::<_, BillboardRow>(
            r"
            UPDATE shop.billboard
            SET label = $3, image_url = $4, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, label, image_url, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(store)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a billboard of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a category still uses it.
    /// Returns `RepositoryError::Database` if the delete fails otherwise.
    pub async fn delete(&self, store: StoreId, id: BillboardId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.billboard WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
