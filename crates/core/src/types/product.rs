//! Catalog and cart product records.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// A product record as served by the remote catalog.
///
/// `amount` is an optional seed quantity some catalogs attach to the record;
/// when absent, a product enters the cart with a quantity of 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
}

impl CatalogProduct {
    /// The quantity this product enters the cart with.
    ///
    /// A missing or zero `amount` seeds as 1; stored entries always carry a
    /// positive quantity.
    #[must_use]
    pub fn seed_amount(&self) -> u32 {
        self.amount.filter(|&amount| amount >= 1).unwrap_or(1)
    }
}

/// A single product + quantity pairing within the cart.
///
/// Entries are unique by `id` and always carry `amount >= 1`; removal
/// deletes the entry rather than zeroing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Product image URL.
    pub image: String,
    /// Quantity of this product held in the cart.
    pub amount: u32,
}

impl CartEntry {
    /// Build an entry from a catalog record and a quantity.
    #[must_use]
    pub fn from_catalog(product: CatalogProduct, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Total price of this line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.amount)
    }
}
