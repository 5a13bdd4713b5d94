//! Color repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdeck_core::{Color, ColorId, ColorInput, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct ColorRow {
    id: Uuid,
    store_id: Uuid,
    name: String,
    value: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
        Self {
            id: ColorId::new(row.id),
            store_id: StoreId::new(row.store_id),
            name: row.name,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for color database operations.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    /// Create a new color repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a store's colors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, store: StoreId) -> Result<Vec<Color>, RepositoryError> {
        let rows = sqlx::query_as::<_, ColorRow>(
            r"
            SELECT id, store_id, name, value, created_at, updated_at
            FROM shop.color
            WHERE store_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(store)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a color of `store` by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, store: StoreId, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            SELECT id, store_id, name, value, created_at, updated_at
            FROM shop.color
            WHERE id = $1 AND store_id = $2
            ",
        )
        .bind(id)
        .bind(store)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a color.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, store: StoreId, input: &ColorInput) -> Result<Color, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            INSERT INTO shop.color (store_id, name, value)
            VALUES ($1, $2, $3)
            RETURNING id, store_id, name, value, created_at, updated_at
            ",
        )
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Update a color of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        store: StoreId,
        id: ColorId,
        input: &ColorInput,
    ) -> Result<Option<Color>, RepositoryError> {
        let row = sqlx::query_as::<_, ColorRow>(
            r"
            UPDATE shop.color
            SET name = $3, value = $4, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING id, store_id, name, value, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(store)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a color of `store`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product still uses it.
    /// Returns `RepositoryError::Database` if the delete fails otherwise.
    pub async fn delete(&self, store: StoreId, id: ColorId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.color WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
