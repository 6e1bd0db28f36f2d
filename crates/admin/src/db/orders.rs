//! Order repository, back-office projection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use furnspace_core::{
    OrderCode, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{AdminOrder, AdminOrderItem};

/// Internal row type for `orders` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    code: String,
    user_id: i32,
    status: String,
    payment_status: String,
    payment_method: String,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    cancellation_reason: Option<String>,
    cancelled_at: Option<DateTime<Utc>>,
    return_reason: Option<String>,
    returned_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<AdminOrderItem>) -> Result<AdminOrder, RepositoryError> {
        let code = OrderCode::parse(&self.code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order code in database: {e}"))
        })?;
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status = self.payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(AdminOrder {
            id: OrderId::new(self.id),
            code,
            user_id: UserId::new(self.user_id),
            status,
            payment_status,
            payment_method: self.payment_method,
            items,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            cancellation_reason: self.cancellation_reason,
            cancelled_at: self.cancelled_at,
            return_reason: self.return_reason,
            returned_at: self.returned_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Internal row type for `order_items` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    name: String,
    unit_price: Decimal,
    quantity: i32,
    color: Option<String>,
    size: Option<String>,
    image: Option<String>,
}

impl From<OrderItemRow> for AdminOrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            color: row.color,
            size: row.size,
            image: row.image,
        }
    }
}

const ORDER_COLUMNS: &str = "id, code, user_id, status, payment_status, payment_method, subtotal, \
     tax, total, cancellation_reason, cancelled_at, return_reason, returned_at, created_at, \
     updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, name, unit_price, quantity, color, size, image";

/// Repository for back-office order operations.
pub struct AdminOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminOrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every order, newest first, items included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<AdminOrderItem>> = HashMap::new();
        for item in item_rows {
            by_order.entry(item.order_id).or_default().push(item.into());
        }

        rows.into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<AdminOrder>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
                    "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
                ))
                .bind(row.id)
                .fetch_all(self.pool)
                .await?;

                let items = item_rows.into_iter().map(Into::into).collect();
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Set an order's fulfillment status.
    ///
    /// The status itself is validated by the caller against
    /// [`OrderStatus::ADMIN_SETTABLE`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id.as_i32())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
