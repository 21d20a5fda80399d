//! Remote stock snapshot.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Available inventory for a product at query time.
///
/// Remote-sourced and read-only; the store never caches these, a fresh
/// snapshot is fetched before every quantity-changing mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub id: ProductId,
    pub amount: u32,
}

impl StockLevel {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.amount >= 1
    }

    /// Whether the given target quantity can be satisfied.
    ///
    /// Mirrors the storefront rule: the target must be strictly below the
    /// available amount.
    #[must_use]
    pub const fn covers(&self, amount: u32) -> bool {
        self.amount > amount
    }
}
