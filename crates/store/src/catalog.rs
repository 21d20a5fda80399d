//! Remote catalog and stock-availability client.
//!
//! Thin REST client over `reqwest`. Product records are cached with `moka`
//! (5-minute TTL); stock levels are never cached, the store fetches a fresh
//! snapshot before every quantity-changing mutation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use cartwheel_core::{CatalogProduct, ProductId, StockLevel};

use crate::error::CatalogError;

/// Fixed per-request timeout for catalog calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the remote catalog service.
///
/// Provides typed access to product records and stock snapshots.
/// Product records are cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    products: Cache<ProductId, CatalogProduct>,
}

impl CatalogClient {
    /// Create a new catalog client for the given base URL.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, the same failure
    /// mode as `reqwest::Client::new`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                products,
            }),
        }
    }

    /// Execute a GET request and parse the JSON body.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        product_id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::UnexpectedStatus {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Fetch the current stock snapshot for a product.
    ///
    /// Never cached; every call hits the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_stock(&self, product_id: ProductId) -> Result<StockLevel, CatalogError> {
        self.fetch(&format!("stock/{product_id}"), product_id).await
    }

    /// Fetch a product record.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<CatalogProduct, CatalogError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: CatalogProduct = self
            .fetch(&format!("products/{product_id}"), product_id)
            .await?;

        // Cache the result
        self.inner.products.insert(product_id, product.clone()).await;

        Ok(product)
    }

    /// Invalidate a cached product record.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.inner.products.invalidate(&product_id).await;
    }
}
