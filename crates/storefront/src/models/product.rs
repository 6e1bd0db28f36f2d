//! Product domain types.
//!
//! Variants are stored as a JSONB sub-document on the product row, mirroring
//! how the catalog treats them as part of the product rather than as
//! separately addressable entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use furnspace_core::ProductId;

pub use furnspace_core::{Variant, VariantOption};

/// A catalog product as the storefront sees it.
///
/// `cost_per_item` is intentionally absent - it is a back-office field and
/// only the admin service exposes it.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Stock-keeping unit, when assigned.
    pub sku: Option<String>,
    /// Brand reference.
    pub brand_id: Option<String>,
    /// Category reference.
    pub category_id: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// List price.
    pub price: Decimal,
    /// Discounted price, when on sale.
    pub sale_price: Option<Decimal>,
    /// Units in stock.
    pub stock: i32,
    /// Product images.
    pub images: Vec<String>,
    /// Variant sub-documents.
    pub variants: Vec<Variant>,
    /// Whether the product is visible on the storefront.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The price a customer actually pays: the sale price when one is set.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }

    /// First product image, used for cart and order line thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_product(price: &str, sale: Option<&str>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Oak Side Table".to_string(),
            description: String::new(),
            sku: None,
            brand_id: None,
            category_id: "tables".to_string(),
            tags: vec![],
            price: price.parse().unwrap(),
            sale_price: sale.map(|s| s.parse().unwrap()),
            stock: 3,
            images: vec!["/img/a.jpg".to_string(), "/img/b.jpg".to_string()],
            variants: vec![],
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        let product = sample_product("199.00", Some("149.00"));
        assert_eq!(product.effective_price(), "149.00".parse().unwrap());

        let product = sample_product("199.00", None);
        assert_eq!(product.effective_price(), "199.00".parse().unwrap());
    }

    #[test]
    fn test_primary_image() {
        let product = sample_product("10.00", None);
        assert_eq!(product.primary_image(), Some("/img/a.jpg"));
    }
}
