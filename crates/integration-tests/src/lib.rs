//! Integration test harness for Cartwheel.
//!
//! Provides an in-process mock of the remote catalog service so the full
//! store (HTTP client, stock checks, durable slot, publication) can run
//! end-to-end without anything external.
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - stock snapshot for a product
//! - `GET /products/{id}` - product record
//!
//! Stock and product records are mutable between requests, so tests can
//! drain stock mid-scenario. A failure switch makes every endpoint answer
//! 500 to exercise the catch-all error paths.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use url::Url;

use cartwheel_core::{CatalogProduct, Price, ProductId, StockLevel};

/// Shared state behind the mock catalog routes.
#[derive(Default)]
struct CatalogState {
    products: Mutex<HashMap<ProductId, CatalogProduct>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    failing: AtomicBool,
}

/// An in-process catalog service bound to an ephemeral port.
pub struct MockCatalog {
    addr: SocketAddr,
    state: Arc<CatalogState>,
}

impl MockCatalog {
    /// Bind and serve the mock catalog on 127.0.0.1 with an OS-picked port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let state = Arc::new(CatalogState::default());

        let app = Router::new()
            .route("/stock/{id}", get(get_stock))
            .route("/products/{id}", get(get_product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock catalog server failed");
        });

        Self { addr, state }
    }

    /// Base URL for pointing a `CatalogClient` at this mock.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("Failed to build base URL")
    }

    /// Register a product record together with its stock level.
    pub fn seed(&self, product: CatalogProduct, stock: u32) {
        if let Ok(mut stocks) = self.state.stock.lock() {
            stocks.insert(product.id, stock);
        }
        if let Ok(mut products) = self.state.products.lock() {
            products.insert(product.id, product);
        }
    }

    /// Replace the stock level for a product.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        if let Ok(mut stocks) = self.state.stock.lock() {
            stocks.insert(product_id, amount);
        }
    }

    /// Make every endpoint answer 500 until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }
}

async fn get_stock(State(state): State<Arc<CatalogState>>, Path(id): Path<i64>) -> Response {
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let id = ProductId::new(id);
    let amount = state
        .stock
        .lock()
        .ok()
        .and_then(|stocks| stocks.get(&id).copied());

    match amount {
        Some(amount) => Json(StockLevel { id, amount }).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_product(State(state): State<Arc<CatalogState>>, Path(id): Path<i64>) -> Response {
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let id = ProductId::new(id);
    let product = state
        .products
        .lock()
        .ok()
        .and_then(|products| products.get(&id).cloned());

    match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// A catalog product with plausible storefront fields.
#[must_use]
pub fn product(id: i64, title: &str, cents: i64) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(id),
        title: title.to_string(),
        price: Price::from_cents(cents),
        image: format!("https://cdn.example.com/products/{id}.jpg"),
        amount: None,
    }
}

/// Unique temp path for a cart slot, one per test.
#[must_use]
pub fn temp_slot_path() -> PathBuf {
    std::env::temp_dir().join(format!("cartwheel-it-{}.json", uuid::Uuid::new_v4()))
}
