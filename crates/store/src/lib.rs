//! Cartwheel Store - client-side cart state manager.
//!
//! Owns the authoritative in-memory cart, validates every quantity-changing
//! mutation against the remote stock service, persists the result to a
//! durable slot, and publishes the new cart to subscribers.
//!
//! # Architecture
//!
//! - [`cart::CartStore`] - the three mutations plus snapshot/subscribe
//! - [`catalog::CatalogClient`] - reqwest client for `/stock/{id}` and
//!   `/products/{id}` (product records cached via `moka`, stock never)
//! - [`storage::CartStorage`] - durable slot seam (`JsonFileStorage` for
//!   real use, `MemoryStorage` for tests)
//! - [`notify::Notifier`] - fire-and-forget user-facing error sink
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwheel_core::ProductId;
//! use cartwheel_store::cart::CartStore;
//! use cartwheel_store::catalog::CatalogClient;
//! use cartwheel_store::config::StoreConfig;
//! use cartwheel_store::notify::TracingNotifier;
//! use cartwheel_store::storage::JsonFileStorage;
//!
//! let config = StoreConfig::from_env()?;
//! let catalog = CatalogClient::new(&config.catalog_base_url);
//! let storage = JsonFileStorage::new(&config.storage_path);
//! let store = CartStore::open(catalog, storage, TracingNotifier).await?;
//!
//! store.add_product(ProductId::new(1)).await?;
//! let cart = store.cart();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;

pub use cart::CartStore;
pub use catalog::CatalogClient;
pub use config::StoreConfig;
pub use error::{CartError, CatalogError, StorageError};
pub use notify::Notifier;
pub use storage::CartStorage;
