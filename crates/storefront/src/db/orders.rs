//! Order repository.
//!
//! Order + line items are inserted in a single transaction; everything else
//! on the order lifecycle is a single-row update. The unique index on
//! `code` is the collision detector for the generated ORD-xxxxx tokens -
//! an insert that trips it surfaces as `RepositoryError::Conflict` so the
//! checkout flow can regenerate and retry.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use furnspace_core::{
    OrderCode, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{Order, OrderItem, PaymentInfo, ShippingInfo};

/// A line item to persist as part of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
}

/// Everything needed to persist a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub code: OrderCode,
    pub payment_status: PaymentStatus,
    pub payment: PaymentInfo,
    pub shipping: ShippingInfo,
    pub items: Vec<NewOrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Internal row type for `orders` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    code: String,
    user_id: i32,
    status: String,
    payment_status: String,
    payment_method: String,
    cardholder_name: Option<String>,
    card_last4: Option<String>,
    ship_address: String,
    ship_apartment: Option<String>,
    ship_city: String,
    ship_state: String,
    ship_country: String,
    ship_zip_code: String,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    cancellation_reason: Option<String>,
    cancelled_at: Option<DateTime<Utc>>,
    return_reason: Option<String>,
    returned_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let code = OrderCode::parse(&self.code).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order code in database: {e}"))
        })?;
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_status = self.payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            code,
            user_id: UserId::new(self.user_id),
            status,
            payment_status,
            payment: PaymentInfo {
                payment_method: self.payment_method,
                cardholder_name: self.cardholder_name,
                card_last4: self.card_last4,
            },
            shipping: ShippingInfo {
                address: self.ship_address,
                apartment: self.ship_apartment,
                city: self.ship_city,
                state: self.ship_state,
                country: self.ship_country,
                zip_code: self.ship_zip_code,
            },
            items,
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
            cancellation_reason: self.cancellation_reason,
            cancelled_at: self.cancelled_at,
            return_reason: self.return_reason,
            returned_at: self.returned_at,
            created_at: self.created_at,
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

impl From<OrderItemRow> for OrderItem {
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

const ORDER_COLUMNS: &str = "id, code, user_id, status, payment_status, payment_method, \
     cardholder_name, card_last4, ship_address, ship_apartment, ship_city, ship_state, \
     ship_country, ship_zip_code, subtotal, tax, total, cancellation_reason, cancelled_at, \
     return_reason, returned_at, created_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, name, unit_price, quantity, color, size, image";

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

    /// Persist a new order and its line items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` when the order code is already
    /// taken (the caller regenerates and retries).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (code, user_id, payment_status, payment_method,
                                 cardholder_name, card_last4,
                                 ship_address, ship_apartment, ship_city, ship_state,
                                 ship_country, ship_zip_code,
                                 subtotal, tax, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_order.code.as_str())
        .bind(new_order.user_id.as_i32())
        .bind(new_order.payment_status.as_str())
        .bind(&new_order.payment.payment_method)
        .bind(new_order.payment.cardholder_name.as_deref())
        .bind(new_order.payment.card_last4.as_deref())
        .bind(&new_order.shipping.address)
        .bind(new_order.shipping.apartment.as_deref())
        .bind(&new_order.shipping.city)
        .bind(&new_order.shipping.state)
        .bind(&new_order.shipping.country)
        .bind(&new_order.shipping.zip_code)
        .bind(new_order.subtotal)
        .bind(new_order.tax)
        .bind(new_order.total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order code already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let mut items = Vec::with_capacity(new_order.items.len());
        for item in &new_order.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items (order_id, product_id, name, unit_price,
                                          quantity, color, size, image)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING {ORDER_ITEM_COLUMNS}"
            ))
            .bind(row.id)
            .bind(item.product_id.as_i32())
            .bind(&item.name)
            .bind(item.unit_price)
            .bind(item.quantity)
            .bind(item.color.as_deref())
            .bind(item.size.as_deref())
            .bind(item.image.as_deref())
            .fetch_one(&mut *tx)
            .await?;

            items.push(item_row.into());
        }

        tx.commit().await?;

        row.into_order(items)
    }

    /// List a user's orders, newest first, items included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Get an order by ID, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let order_id = row.id;
                let items = self.items_for(order_id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    /// Record a customer cancellation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn mark_cancelled(&self, id: OrderId, reason: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET status = $2, cancellation_reason = $3, cancelled_at = now(), updated_at = now()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(OrderStatus::Cancelled.as_str())
        .bind(reason)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Record a customer return.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn mark_returned(&self, id: OrderId, reason: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders
             SET status = $2, return_reason = $3, returned_at = now(), updated_at = now()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(OrderStatus::Returned.as_str())
        .bind(reason)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set the payment settlement status (Paid -> Refunded after a wallet
    /// credit).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET payment_status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(payment_status.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn items_for(&self, order_id: i32) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fetch items for a batch of orders and zip them back together.
    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM order_items
             WHERE order_id = ANY($1)
             ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
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
}
