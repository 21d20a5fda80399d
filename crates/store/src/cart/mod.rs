//! The cart store: stock-checked mutations over a durable, published cart.
//!
//! Control flow for every mutation: fetch the live stock snapshot (where the
//! mutation changes a quantity), compute the next entry sequence, persist it
//! to the slot, swap it into memory, publish it to subscribers. The whole
//! sequence runs under a per-store mutex, so concurrent UI events serialize
//! instead of racing the fetch-compute-persist window.
//!
//! Failures never escape as panics: each operation returns a typed
//! [`CartError`] and reports exactly one fixed user-facing message through
//! the [`Notifier`]. Success never notifies.

mod transitions;

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use cartwheel_core::{CartEntry, ProductId};

use crate::catalog::CatalogClient;
use crate::error::{CartError, StorageError};
use crate::notify::Notifier;
use crate::storage::CartStorage;

/// Fixed user-facing failure messages, one per failure kind.
pub mod messages {
    /// Requested or target quantity exceeds available stock.
    pub const OUT_OF_STOCK: &str = "Requested quantity is out of stock";
    /// Adding a product failed for any other reason.
    pub const ADD_FAILED: &str = "Could not add the product to the cart";
    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Could not remove the product from the cart";
    /// Changing a quantity failed for any other reason.
    pub const UPDATE_FAILED: &str = "Could not change the product quantity";
}

/// Which operation a failure belongs to, for message selection.
#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    fn failure_message(self, err: &CartError) -> &'static str {
        match err {
            CartError::OutOfStock { .. } => messages::OUT_OF_STOCK,
            _ => match self {
                Self::Add => messages::ADD_FAILED,
                Self::Remove => messages::REMOVE_FAILED,
                Self::Update => messages::UPDATE_FAILED,
            },
        }
    }
}

/// The authoritative cart state manager.
///
/// Cheap to share behind an `Arc`; all mutations serialize on an internal
/// mutex. UI consumers read snapshots via [`CartStore::cart`] or follow
/// changes via [`CartStore::subscribe`].
pub struct CartStore<S: CartStorage, N: Notifier> {
    catalog: CatalogClient,
    storage: S,
    notifier: N,
    state: Mutex<Vec<CartEntry>>,
    publisher: watch::Sender<Vec<CartEntry>>,
}

impl<S: CartStorage, N: Notifier> CartStore<S, N> {
    /// Open the store, loading the persisted cart from the slot.
    ///
    /// A missing slot starts empty. A corrupt slot fails closed: the content
    /// is ignored with a warning and the cart starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    pub async fn open(catalog: CatalogClient, storage: S, notifier: N) -> Result<Self, StorageError> {
        let initial = match storage.load().await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(error = %e, "cart slot is corrupt, starting with an empty cart");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let (publisher, _) = watch::channel(initial.clone());

        Ok(Self {
            catalog,
            storage,
            notifier,
            state: Mutex::new(initial),
            publisher,
        })
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Vec<CartEntry> {
        self.publisher.borrow().clone()
    }

    /// Follow cart changes. Receivers observe the new cart after each
    /// successful mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartEntry>> {
        self.publisher.subscribe()
    }

    /// Add one unit of a product to the cart.
    ///
    /// A product not yet in the cart enters with the catalog's seed quantity
    /// (1 unless the record says otherwise); an existing entry is bumped by
    /// one. Both paths validate against a fresh stock snapshot first.
    ///
    /// # Errors
    ///
    /// `OutOfStock` when stock cannot cover the target quantity, `Catalog`
    /// or `Storage` on collaborator failures. State is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.state.lock().await;
        self.try_add(&mut cart, product_id)
            .await
            .inspect_err(|err| self.report(Operation::Add, err))
    }

    /// Remove a product's entry from the cart.
    ///
    /// # Errors
    ///
    /// `NotInCart` when the product has no entry (a second consecutive
    /// remove therefore fails without further effect), `Storage` on
    /// persistence failure. State is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.state.lock().await;
        self.try_remove(&mut cart, product_id)
            .await
            .inspect_err(|err| self.report(Operation::Remove, err))
    }

    /// Set a product's quantity to an exact amount, position preserved.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for a zero amount (remove the entry instead),
    /// `OutOfStock` when stock does not strictly exceed the target,
    /// `NotInCart` when the product has no entry, `Catalog`/`Storage` on
    /// collaborator failures. State is unchanged on error.
    #[instrument(skip(self), fields(product_id = %product_id, amount))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<(), CartError> {
        let mut cart = self.state.lock().await;
        self.try_update(&mut cart, product_id, amount)
            .await
            .inspect_err(|err| self.report(Operation::Update, err))
    }

    async fn try_add(
        &self,
        cart: &mut Vec<CartEntry>,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let stock = self.catalog.get_stock(product_id).await?;
        if !stock.is_available() {
            return Err(CartError::OutOfStock {
                requested: 1,
                available: stock.amount,
            });
        }

        let next = if let Some(entry) = transitions::find_entry(cart, product_id) {
            let target = entry.amount + 1;
            if !stock.covers(target) {
                return Err(CartError::OutOfStock {
                    requested: target,
                    available: stock.amount,
                });
            }

            transitions::with_entry_amount(cart, product_id, target)
                .ok_or(CartError::NotInCart(product_id))?
        } else {
            let product = self.catalog.get_product(product_id).await?;
            let amount = product.seed_amount();
            if amount > stock.amount {
                return Err(CartError::OutOfStock {
                    requested: amount,
                    available: stock.amount,
                });
            }

            transitions::with_new_entry(cart, CartEntry::from_catalog(product, amount))
        };

        self.commit(cart, next).await
    }

    async fn try_remove(
        &self,
        cart: &mut Vec<CartEntry>,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let next = transitions::without_entry(cart, product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(cart, next).await
    }

    async fn try_update(
        &self,
        cart: &mut Vec<CartEntry>,
        product_id: ProductId,
        amount: u32,
    ) -> Result<(), CartError> {
        if amount == 0 {
            return Err(CartError::InvalidAmount(amount));
        }

        let stock = self.catalog.get_stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                requested: amount,
                available: stock.amount,
            });
        }

        let next = transitions::with_entry_amount(cart, product_id, amount)
            .ok_or(CartError::NotInCart(product_id))?;

        self.commit(cart, next).await
    }

    /// Persist first, then swap memory and publish. On a persistence
    /// failure memory is untouched, so slot and memory never diverge after
    /// a completed operation.
    async fn commit(
        &self,
        cart: &mut Vec<CartEntry>,
        next: Vec<CartEntry>,
    ) -> Result<(), CartError> {
        self.storage.save(&next).await?;
        *cart = next.clone();
        self.publisher.send_replace(next);
        Ok(())
    }

    fn report(&self, operation: Operation, err: &CartError) {
        tracing::debug!(?operation, error = %err, "cart operation failed");
        self.notifier.error(operation.failure_message(err));
    }
}
