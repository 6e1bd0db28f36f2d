//! Order domain types, back-office projection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::{OrderCode, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

/// A snapshot line item on an order.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
}

/// An order as the back office sees it.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrder {
    pub id: OrderId,
    pub code: OrderCode,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub items: Vec<AdminOrderItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub return_reason: Option<String>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
