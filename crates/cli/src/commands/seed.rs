//! Demo catalog seeding.
//!
//! Inserts a small furniture catalog for local development. Skipped when
//! the products table already has rows, so it is safe to run repeatedly.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;

use furnspace_core::{Variant, VariantOption};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("missing environment variable: STOREFRONT_DATABASE_URL (or DATABASE_URL)")]
    MissingEnvVar,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    sku: &'static str,
    category_id: &'static str,
    tags: &'static [&'static str],
    price: &'static str,
    sale_price: Option<&'static str>,
    stock: i32,
    images: &'static [&'static str],
    variants: Vec<Variant>,
}

fn demo_catalog() -> Vec<SeedProduct> {
    let wood_finishes = Variant {
        kind: "color".to_string(),
        options: vec![
            VariantOption {
                value: "walnut".to_string(),
                images: vec!["/img/walnut.jpg".to_string()],
            },
            VariantOption {
                value: "oak".to_string(),
                images: vec!["/img/oak.jpg".to_string()],
            },
        ],
    };

    vec![
        SeedProduct {
            name: "Oak Side Table",
            description: "Solid oak side table with a hand-rubbed oil finish.",
            sku: "TBL-OAK-001",
            category_id: "tables",
            tags: &["wood", "living-room"],
            price: "149.00",
            sale_price: None,
            stock: 24,
            images: &["/img/oak-side-table.jpg"],
            variants: vec![wood_finishes.clone()],
        },
        SeedProduct {
            name: "Walnut Bookshelf",
            description: "Five-shelf walnut bookcase, 180cm tall.",
            sku: "SHF-WAL-002",
            category_id: "storage",
            tags: &["wood", "office"],
            price: "389.00",
            sale_price: Some("329.00"),
            stock: 8,
            images: &["/img/walnut-bookshelf.jpg"],
            variants: vec![wood_finishes.clone()],
        },
        SeedProduct {
            name: "Linen Lounge Chair",
            description: "Low-profile lounge chair upholstered in washed linen.",
            sku: "CHR-LIN-003",
            category_id: "seating",
            tags: &["fabric", "living-room"],
            price: "459.00",
            sale_price: None,
            stock: 12,
            images: &["/img/linen-lounge-chair.jpg"],
            variants: vec![Variant {
                kind: "size".to_string(),
                options: vec![
                    VariantOption {
                        value: "standard".to_string(),
                        images: vec![],
                    },
                    VariantOption {
                        value: "wide".to_string(),
                        images: vec![],
                    },
                ],
            }],
        },
    ]
}

/// Seed the demo catalog.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| SeedError::MissingEnvVar)?;
    let pool = PgPool::connect(&database_url).await?;

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        tracing::info!(existing = count, "products table is not empty, skipping seed");
        return Ok(());
    }

    let catalog = demo_catalog();
    for product in &catalog {
        insert_product(&pool, product).await?;
    }

    tracing::info!(inserted = catalog.len(), "demo catalog seeded");
    Ok(())
}

async fn insert_product(pool: &PgPool, product: &SeedProduct) -> Result<(), SeedError> {
    let price: Decimal = product.price.parse().unwrap_or_default();
    let sale_price: Option<Decimal> = product.sale_price.map(|p| p.parse().unwrap_or_default());
    let tags: Vec<String> = product.tags.iter().map(ToString::to_string).collect();
    let images: Vec<String> = product.images.iter().map(ToString::to_string).collect();

    sqlx::query(
        "INSERT INTO products (name, description, sku, category_id, tags, price, sale_price,
                               stock, images, variants)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(product.name)
    .bind(product.description)
    .bind(product.sku)
    .bind(product.category_id)
    .bind(&tags)
    .bind(price)
    .bind(sale_price)
    .bind(product.stock)
    .bind(&images)
    .bind(Json(&product.variants))
    .execute(pool)
    .await?;

    Ok(())
}
