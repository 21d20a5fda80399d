//! Error types for catalog access, storage, and cart mutations.
//!
//! Every cart operation returns `Result<(), CartError>` and additionally
//! reports exactly one user-facing message through the configured
//! [`Notifier`](crate::notify::Notifier). The variants stay distinct so
//! callers can tell "not in cart" from "network failure" from "stock
//! insufficient" even though some share a user-facing message.

use cartwheel_core::ProductId;
use thiserror::Error;

/// Errors from the remote catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product unknown to the catalog.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Catalog answered with an unexpected status code.
    #[error("unexpected status {status} from catalog: {body}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Errors from the durable cart slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot holds content that is not a serialized cart.
    #[error("corrupt cart slot: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Serializing the cart for the slot failed.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested or target quantity exceeds available stock.
    #[error("out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: u32, available: u32 },

    /// The product has no entry in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// A zero quantity would violate the no-zero-entries invariant;
    /// removal is how entries are deleted.
    #[error("invalid quantity: {0}")]
    InvalidAmount(u32),

    /// Catalog lookup failed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
