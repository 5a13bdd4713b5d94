//! Store repository.
//!
//! Stores are the only rows keyed by owner; every query here filters on
//! `user_id` so a caller can never see or touch another owner's store.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdeck_core::{Store, StoreId, StoreInput, UserId};

use super::RepositoryError;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    name: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StoreRow> for Store {
    fn from(row: StoreRow) -> Self {
        Self {
            id: StoreId::new(row.id),
            name: row.name,
            user_id: UserId::new(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for store database operations.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a store owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, owner: &UserId, input: &StoreInput) -> Result<Store, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            INSERT INTO shop.store (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id, created_at, updated_at
            ",
        )
        .bind(&input.name)
        .bind(owner)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List every store owned by `owner`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_owned(&self, owner: &UserId) -> Result<Vec<Store>, RepositoryError> {
        let rows = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, user_id, created_at, updated_at
            FROM shop.store
            WHERE user_id = $1
            ORDER BY created_at ASC
            ",
        )
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a store by ID, only if `owner` owns it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_owned(
        &self,
        id: StoreId,
        owner: &UserId,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            SELECT id, name, user_id, created_at, updated_at
            FROM shop.store
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Rename a store owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: StoreId,
        owner: &UserId,
        input: &StoreInput,
    ) -> Result<Option<Store>, RepositoryError> {
        let row = sqlx::query_as::<_, StoreRow>(
            r"
            UPDATE shop.store
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, user_id, created_at, updated_at
            ",
        )
        .bind(id)
        .bind(owner)
        .bind(&input.name)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a store owned by `owner`, cascading to all of its rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: StoreId, owner: &UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.store WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
