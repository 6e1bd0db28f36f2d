//! Cart domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::{CartId, CartItemId, ProductId};

/// A line in a user's cart, with the product fields needed for display
/// joined in.
///
/// The price here is the product's current effective price - carts track
/// intent, not a price promise. The snapshot happens at checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// Line ID.
    pub id: CartItemId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Product display name.
    pub name: String,
    /// Current effective unit price.
    pub unit_price: Decimal,
    /// Thumbnail image, when the product has one.
    pub image: Option<String>,
    /// Quantity of this line.
    pub quantity: i32,
    /// Selected color, when the product has a color variant.
    pub color: Option<String>,
    /// Selected size, when the product has a size variant.
    pub size: Option<String>,
}

impl CartLine {
    /// Whether an incoming (product, color, size) selection merges into
    /// this line. All three must match; a differing variant is a new line.
    #[must_use]
    pub fn matches(&self, product_id: ProductId, color: Option<&str>, size: Option<&str>) -> bool {
        self.product_id == product_id
            && self.color.as_deref() == color
            && self.size.as_deref() == size
    }

    /// Line total (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A user's cart with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// The lines in the cart.
    pub items: Vec<CartLine>,
    /// When the cart was last touched.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|line| i64::from(line.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(product: i32, color: Option<&str>, size: Option<&str>, qty: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(product),
            product_id: ProductId::new(product),
            name: format!("product-{product}"),
            unit_price: "25.00".parse().unwrap(),
            image: None,
            quantity: qty,
            color: color.map(String::from),
            size: size.map(String::from),
        }
    }

    #[test]
    fn test_matches_requires_full_variant_key() {
        let existing = line(1, Some("walnut"), Some("L"), 1);

        assert!(existing.matches(ProductId::new(1), Some("walnut"), Some("L")));
        assert!(!existing.matches(ProductId::new(1), Some("oak"), Some("L")));
        assert!(!existing.matches(ProductId::new(1), Some("walnut"), None));
        assert!(!existing.matches(ProductId::new(2), Some("walnut"), Some("L")));
    }

    #[test]
    fn test_matches_with_no_variant() {
        let existing = line(1, None, None, 1);
        assert!(existing.matches(ProductId::new(1), None, None));
        assert!(!existing.matches(ProductId::new(1), Some("walnut"), None));
    }

    #[test]
    fn test_subtotal_and_count() {
        let cart = Cart {
            id: CartId::new(1),
            items: vec![line(1, None, None, 2), line(2, Some("oak"), None, 3)],
            updated_at: Utc::now(),
        };

        assert_eq!(cart.subtotal(), "125.00".parse().unwrap());
        assert_eq!(cart.item_count(), 5);
    }
}
