//! Read-only product catalog accessor.
//!
//! The catalog is a point-in-time view over a product list loaded either from
//! a local JSON file at startup or from a remote catalog service in the
//! background. Consumers only ever see derived views ([`views`]); nothing here
//! mutates the product list after a load completes.
//!
//! Remote category listings are cached with `moka` (5-minute TTL), the same
//! way upstream API reads are cached elsewhere in this workspace.

pub mod views;

use std::path::Path;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

use clementine_core::ProductId;

use crate::stores::ProductSnapshot;

/// Default bound for related-product listings.
pub const RELATED_LIMIT: usize = 4;
/// Default bound for flash-sale listings.
pub const FLASH_SALE_LIMIT: usize = 8;
/// Default bound for best-selling listings.
pub const BEST_SELLING_LIMIT: usize = 8;

/// A catalog product.
///
/// Immutable from the storefront's point of view; optional fields default so
/// older catalog documents keep deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Opaque product identity.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current price.
    pub price: Decimal,
    /// Pre-discount price, when the product is on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    /// Star rating, 0-5.
    #[serde(default)]
    pub rating: f32,
    /// Review count.
    #[serde(default)]
    pub reviews: u32,
    /// Image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Category name.
    pub category: String,
    /// Whether the product can currently be purchased.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// Available color variants.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Available size variants.
    #[serde(default)]
    pub sizes: Vec<String>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// The slice of this product that cart and wishlist entries carry.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.images.first().cloned(),
        }
    }

    /// Discount percentage, when the original price is strictly greater than
    /// the current price.
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        self.original_price
            .filter(|original| *original > self.price)
            .map(|original| (original - self.price) / original * Decimal::ONE_HUNDRED)
    }
}

/// Errors that can occur loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document is not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The remote fetch failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote catalog answered with a non-success status.
    #[error("catalog returned HTTP {0}")]
    Status(u16),

    /// Building the request URL failed.
    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),

    /// A remote operation was requested but no remote catalog is configured.
    #[error("no remote catalog configured")]
    NotConfigured,
}

// =============================================================================
// Catalog
// =============================================================================

/// Read-only accessor over the product list.
///
/// Cheaply cloneable; all clones share the same product list and cache.
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    products: RwLock<Vec<Product>>,
    loaded: AtomicBool,
    remote: Option<RemoteCatalog>,
}

struct RemoteCatalog {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl Catalog {
    /// Build a loaded catalog from an in-memory product list.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(CatalogInner {
                products: RwLock::new(products),
                loaded: AtomicBool::new(true),
                remote: None,
            }),
        }
    }

    /// Load the catalog from a local JSON file (an array of products).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        Ok(Self::from_products(products))
    }

    /// Build an empty catalog backed by a remote catalog service.
    ///
    /// The catalog starts in the loading state; call [`Self::spawn_refresh`]
    /// (or [`Self::refresh`]) to populate it.
    #[must_use]
    pub fn remote(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogInner {
                products: RwLock::new(Vec::new()),
                loaded: AtomicBool::new(false),
                remote: Some(RemoteCatalog {
                    client: reqwest::Client::new(),
                    base_url,
                    cache,
                }),
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Product>> {
        self.inner.products.read().expect("catalog lock poisoned")
    }

    /// Whether the initial load has completed. Starts false for remote
    /// catalogs and flips to true exactly once.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.loaded.load(Ordering::Acquire)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<Product> {
        self.read().iter().find(|p| &p.id == product_id).cloned()
    }

    /// Clone of the full product list.
    #[must_use]
    pub fn all(&self) -> Vec<Product> {
        self.read().clone()
    }

    /// Products in a category (local view).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Product> {
        views::by_category(&self.read(), category)
    }

    /// Case-insensitive name search.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Product> {
        views::search(&self.read(), query)
    }

    /// Related products (same category, excluding self).
    #[must_use]
    pub fn related(&self, product_id: &ProductId, limit: usize) -> Vec<Product> {
        views::related(&self.read(), product_id, limit)
    }

    /// Discounted products, steepest discount first.
    #[must_use]
    pub fn flash_sale(&self, limit: usize) -> Vec<Product> {
        views::flash_sale(&self.read(), limit)
    }

    /// Most-reviewed products first.
    #[must_use]
    pub fn best_selling(&self, limit: usize) -> Vec<Product> {
        views::best_selling(&self.read(), limit)
    }

    /// Fetch the full product list from the remote catalog and swap it in.
    ///
    /// The swap happens only after the fetch completes, so aborting an
    /// in-flight refresh leaves the catalog untouched.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotConfigured` if this catalog has no remote
    /// source, or a transport/status/parse error from the fetch.
    pub async fn refresh(&self) -> Result<usize, CatalogError> {
        let remote = self.inner.remote.as_ref().ok_or(CatalogError::NotConfigured)?;
        let products = remote.fetch_products(None).await?;
        let count = products.len();

        {
            let mut current = self.inner.products.write().expect("catalog lock poisoned");
            *current = products;
        }
        self.inner.loaded.store(true, Ordering::Release);

        Ok(count)
    }

    /// Run [`Self::refresh`] in the background.
    ///
    /// The returned handle aborts the fetch when dropped, so the task's
    /// lifetime is tied to whoever owns the handle.
    #[must_use]
    pub fn spawn_refresh(&self) -> RefreshHandle {
        let catalog = self.clone();
        let handle = tokio::spawn(async move {
            match catalog.refresh().await {
                Ok(count) => tracing::info!(products = count, "catalog refreshed"),
                Err(e) => tracing::error!("catalog refresh failed: {e}"),
            }
        });
        RefreshHandle { handle }
    }

    /// Products in a category, served from the remote catalog when one is
    /// configured (cached, 5-minute TTL) and from the local list otherwise.
    ///
    /// # Errors
    ///
    /// Returns a transport/status/parse error from the remote fetch.
    pub async fn products_in_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let Some(remote) = self.inner.remote.as_ref() else {
            return Ok(self.by_category(category));
        };

        if let Some(hit) = remote.cache.get(category).await {
            return Ok(hit.as_ref().clone());
        }

        let products = remote.fetch_products(Some(category)).await?;
        remote
            .cache
            .insert(category.to_string(), Arc::new(products.clone()))
            .await;
        Ok(products)
    }
}

impl RemoteCatalog {
    /// GET `/products`, optionally filtered by category.
    async fn fetch_products(&self, category: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let mut url = self.base_url.join("products")?;
        if let Some(category) = category {
            url.query_pairs_mut().append_pair("category", category);
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Handle to an in-flight background catalog refresh.
///
/// Aborting (explicitly or by dropping the handle) cancels the fetch at its
/// next await point; an aborted refresh never mutates the catalog.
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    /// Cancel the refresh.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(4999, 2),
            original_price: None,
            rating: 4.5,
            reviews: 10,
            images: vec![format!("/images/{id}.jpg"), format!("/images/{id}-alt.jpg")],
            category: "Audio".to_string(),
            in_stock: true,
            colors: Vec::new(),
            sizes: Vec::new(),
        }
    }

    #[test]
    fn test_from_products_is_loaded() {
        let catalog = Catalog::from_products(vec![product("p1")]);
        assert!(catalog.is_loaded());
        assert!(catalog.get(&ProductId::new("p1")).is_some());
        assert!(catalog.get(&ProductId::new("missing")).is_none());
    }

    #[test]
    fn test_remote_starts_loading() {
        let catalog = Catalog::remote(Url::parse("http://localhost:9000").unwrap());
        assert!(!catalog.is_loaded());
        assert!(catalog.all().is_empty());
    }

    #[test]
    fn test_snapshot_takes_first_image() {
        let snapshot = product("p1").snapshot();
        assert_eq!(snapshot.image.as_deref(), Some("/images/p1.jpg"));
        assert_eq!(snapshot.id, ProductId::new("p1"));
    }

    #[test]
    fn test_discount_percent() {
        let mut p = product("p1");
        assert_eq!(p.discount_percent(), None);

        p.original_price = Some(Decimal::new(9998, 2));
        assert_eq!(p.discount_percent(), Some(Decimal::new(50, 0)));

        // An original price at or below the current price is not a discount
        p.original_price = Some(p.price);
        assert_eq!(p.discount_percent(), None);
    }

    #[test]
    fn test_tolerates_missing_optional_fields() {
        let raw = r#"{"id": "p9", "name": "Desk Lamp", "price": "24.00", "category": "Home"}"#;
        let p: Product = serde_json::from_str(raw).unwrap();
        assert!(p.in_stock);
        assert_eq!(p.reviews, 0);
        assert!(p.images.is_empty());
        assert_eq!(p.original_price, None);
    }

    #[test]
    fn test_bundled_catalog_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/products.json");
        let catalog = Catalog::from_file(path).unwrap();
        assert!(!catalog.all().is_empty());
        // The demo data must exercise the flash-sale view
        assert!(!catalog.flash_sale(FLASH_SALE_LIMIT).is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            Catalog::from_file("/nonexistent/products.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
