//! Order repository.
//!
//! Orders are only ever created by checkout. Payment reconciliation happens
//! outside this service, so every order starts unpaid with empty contact
//! fields.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use shopdeck_core::{Order, OrderId, ProductId, StoreId};

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    store_id: Uuid,
    is_paid: bool,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            store_id: StoreId::new(row.store_id),
            is_paid: row.is_paid,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an unpaid order with one item per product.
    ///
    /// The order and its items are written in a single transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a product does not exist.
    /// Returns `RepositoryError::Database` if an insert fails otherwise.
    pub async fn create(
        &self,
        store: StoreId,
        product_ids: &[ProductId],
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO shop."order" (store_id, is_paid)
            VALUES ($1, FALSE)
            RETURNING id, store_id, is_paid, phone, address, created_at, updated_at
            "#,
        )
        .bind(store)
        .fetch_one(&mut *tx)
        .await?;

        for product_id in product_ids {
            sqlx::query("INSERT INTO shop.order_item (order_id, product_id) VALUES ($1, $2)")
                .bind(order.id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(order.into())
    }
}
