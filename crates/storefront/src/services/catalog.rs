//! Catalog reads with a short-TTL cache.
//!
//! The storefront's product pages are the hottest read path and tolerate a
//! minute of staleness, so listings and details sit behind a moka cache.
//! The admin service writes the catalog through its own connection; edits
//! become visible here when the TTL lapses.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use furnspace_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// How long cached catalog entries live.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on cached entries (listing + per-product details).
const CACHE_CAPACITY: u64 = 2_048;

/// Shared cache for catalog reads, stored in the application state.
#[derive(Clone)]
pub struct CatalogCache {
    listing: Cache<(), Arc<Vec<Product>>>,
    products: Cache<i32, Arc<Product>>,
}

impl CatalogCache {
    /// Create an empty catalog cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listing: Cache::builder()
                .max_capacity(1)
                .time_to_live(CACHE_TTL)
                .build(),
            products: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Catalog read service: repository + cache.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    cache: &'a CatalogCache,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, cache: &'a CatalogCache) -> Self {
        Self {
            products: ProductRepository::new(pool),
            cache,
        }
    }

    /// Active products, newest first, served from cache when warm.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the cache is cold and the
    /// query fails.
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(cached) = self.cache.listing.get(&()).await {
            return Ok(cached);
        }

        let products = Arc::new(self.products.list_active().await?);
        self.cache.listing.insert((), Arc::clone(&products)).await;
        Ok(products)
    }

    /// A single product by ID, served from cache when warm.
    ///
    /// Inactive products are still returned - direct links keep working
    /// even after a product is pulled from the listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the cache is cold and the
    /// query fails.
    pub async fn get_product(
        &self,
        id: ProductId,
    ) -> Result<Option<Arc<Product>>, RepositoryError> {
        if let Some(cached) = self.cache.products.get(&id.as_i32()).await {
            return Ok(Some(cached));
        }

        match self.products.get(id).await? {
            Some(product) => {
                let product = Arc::new(product);
                self.cache
                    .products
                    .insert(id.as_i32(), Arc::clone(&product))
                    .await;
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }
}
