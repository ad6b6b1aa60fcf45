//! Read-only catalog client.
//!
//! Products and categories are cached in memory with `moka` (5-minute TTL).
//! Searches bypass the cache.

mod cache;

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use shopfront_core::{Category, CategoryId, Product, ProductPage};

use crate::error::ApiError;
use crate::http::{ApiClient, path_segment};

use cache::{CacheKey, CacheValue};

/// How long catalog reads stay cached.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Sort orders accepted by `GET /products`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl ProductSort {
    /// Query-string value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Name => "name",
        }
    }
}

impl std::str::FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            _ => Err(format!("invalid sort: {s}")),
        }
    }
}

/// Filters for a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub category: Option<CategoryId>,
    pub search: Option<String>,
    pub sort: ProductSort,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            category: None,
            search: None,
            sort: ProductSort::default(),
        }
    }
}

impl ProductQuery {
    /// Whether this is a free-text search (never cached).
    #[must_use]
    pub fn is_search(&self) -> bool {
        self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// Request path with the encoded query string.
    #[must_use]
    pub fn to_path(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("page", &self.page.max(1).to_string());
        query.append_pair("limit", &self.limit.to_string());
        if let Some(category) = &self.category {
            query.append_pair("category", category.as_str());
        }
        if self.is_search()
            && let Some(search) = &self.search
        {
            query.append_pair("search", search.trim());
        }
        query.append_pair("sort", self.sort.as_str());
        format!("/products?{}", query.finish())
    }
}

/// Catalog client with a shared read cache.
#[derive(Clone)]
pub struct CatalogClient {
    client: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a catalog client over an API client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();
        Self { client, cache }
    }

    /// A page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let path = query.to_path();
        let key = CacheKey::Products(path.clone());

        if !query.is_search()
            && let Some(CacheValue::Products(page)) = self.cache.get(&key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let page: ProductPage = self.client.get(&path).await?;

        if !query.is_search() {
            self.cache
                .insert(key, CacheValue::Products(page.clone()))
                .await;
        }
        Ok(page)
    }

    /// A product by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product(&self, slug: &str) -> Result<Product, ApiError> {
        let key = CacheKey::Product(slug.to_string());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/products/{}", path_segment(slug));
        let product: Product = self.client.get(&path).await?;
        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) = self.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.client.get("/categories").await?;
        self.cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, slug: &str) {
        self.cache
            .invalidate(&CacheKey::Product(slug.to_string()))
            .await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{MockTransport, envelope};

    fn product_json(slug: &str) -> serde_json::Value {
        serde_json::json!({
            "id": format!("id-{slug}"),
            "name": slug,
            "slug": slug,
            "price": "12.50",
            "stock": 4
        })
    }

    fn catalog() -> (CatalogClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new(|req| {
            Ok(if req.path.starts_with("/products?") {
                envelope(
                    200,
                    serde_json::json!({"products": [product_json("tee")], "total": 1, "totalPages": 1}),
                )
            } else if req.path == "/categories" {
                envelope(200, serde_json::json!([{"id": "c1", "name": "Tops", "slug": "tops"}]))
            } else {
                envelope(200, product_json("tee"))
            })
        }));
        let client = ApiClient::new(transport.clone(), Arc::new(MemoryStorage::new()));
        (CatalogClient::new(client), transport)
    }

    #[test]
    fn test_query_path_encoding() {
        let query = ProductQuery {
            category: Some(CategoryId::new("c1")),
            search: Some("  red shirt ".to_string()),
            sort: ProductSort::PriceAsc,
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_path(),
            "/products?page=1&limit=20&category=c1&search=red+shirt&sort=price_asc"
        );

        let blank = ProductQuery {
            search: Some("   ".to_string()),
            ..ProductQuery::default()
        };
        assert!(!blank.is_search());
        assert_eq!(blank.to_path(), "/products?page=1&limit=20&sort=newest");
    }

    #[tokio::test]
    async fn test_product_is_cached() {
        let (catalog, transport) = catalog();
        let first = catalog.product("tee").await.unwrap();
        let second = catalog.product("tee").await.unwrap();
        assert_eq!(first, second);
        assert!(first.in_stock());
        assert_eq!(transport.count_path("/products/tee"), 1);

        catalog.invalidate_product("tee").await;
        catalog.product("tee").await.unwrap();
        assert_eq!(transport.count_path("/products/tee"), 2);
    }

    #[tokio::test]
    async fn test_search_bypasses_cache() {
        let (catalog, transport) = catalog();
        let search = ProductQuery {
            search: Some("tee".to_string()),
            ..ProductQuery::default()
        };
        catalog.products(&search).await.unwrap();
        catalog.products(&search).await.unwrap();
        assert_eq!(transport.count_path(&search.to_path()), 2);

        let listing = ProductQuery::default();
        let page = catalog.products(&listing).await.unwrap();
        catalog.products(&listing).await.unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(transport.count_path(&listing.to_path()), 1);
    }

    #[tokio::test]
    async fn test_categories_cached() {
        let (catalog, transport) = catalog();
        let categories = catalog.categories().await.unwrap();
        catalog.categories().await.unwrap();
        assert_eq!(categories[0].slug, "tops");
        assert_eq!(transport.count_path("/categories"), 1);
    }
}
