//! Product domain types, back-office projection.
//!
//! Unlike the storefront's view, this one carries the cost and inventory
//! fields merchandisers manage.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::{ProductId, Variant};

/// A catalog product with every back-office field.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub sku: Option<String>,
    pub brand_id: Option<String>,
    pub category_id: String,
    pub tags: Vec<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    /// Unit cost, for margin reporting. Never exposed on the storefront.
    pub cost_per_item: Option<Decimal>,
    pub stock: i32,
    /// Stock level at which the product counts as low-stock.
    pub low_stock_threshold: i32,
    pub images: Vec<String>,
    pub variants: Vec<Variant>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminProduct {
    /// Whether stock has fallen to the low-stock threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}
