//! Order domain types.
//!
//! An order is a point-in-time snapshot: its line items copy the product
//! name, unit price, and image by value at checkout, so catalog edits made
//! afterwards never alter what the customer bought.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::{OrderCode, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId, UserId};

/// How an order was paid, as recorded at checkout.
///
/// Only the cardholder name and the last four digits survive persistence;
/// the full card number and CVV are dropped before the order is written.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentInfo {
    /// Payment method identifier, e.g. "card" or "cod".
    pub payment_method: String,
    /// Name on the card, for card payments.
    pub cardholder_name: Option<String>,
    /// Last four digits of the card number, for card payments.
    pub card_last4: Option<String>,
}

/// Destination address captured at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct ShippingInfo {
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// A snapshot line item on an order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    /// Line ID.
    pub id: OrderItemId,
    /// The product this line was copied from. Not a foreign key into the
    /// live catalog - the product may have changed or been deactivated.
    pub product_id: ProductId,
    /// Product name at checkout time.
    pub name: String,
    /// Unit price at checkout time.
    pub unit_price: Decimal,
    /// Quantity ordered.
    pub quantity: i32,
    /// Selected color, if any.
    pub color: Option<String>,
    /// Selected size, if any.
    pub size: Option<String>,
    /// Thumbnail image at checkout time.
    pub image: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Database ID.
    pub id: OrderId,
    /// Customer-facing order code (ORD-xxxxx).
    pub code: OrderCode,
    /// Owning user.
    pub user_id: UserId,
    /// Fulfillment status.
    pub status: OrderStatus,
    /// Payment settlement status.
    pub payment_status: PaymentStatus,
    /// Payment details captured at checkout.
    pub payment: PaymentInfo,
    /// Shipping destination captured at checkout.
    pub shipping: ShippingInfo,
    /// The snapshot line items.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Tax charged.
    pub tax: Decimal,
    /// Grand total (subtotal + tax). This is the amount refunded to the
    /// wallet on return.
    pub total: Decimal,
    /// Reason supplied when the customer cancelled, if they did.
    pub cancellation_reason: Option<String>,
    /// When the order was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Reason supplied when the customer returned the order, if they did.
    pub return_reason: Option<String>,
    /// When the order was returned.
    pub returned_at: Option<DateTime<Utc>>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
