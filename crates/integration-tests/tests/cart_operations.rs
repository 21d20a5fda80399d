//! End-to-end cart mutation tests against the in-process mock catalog.
//!
//! Each test gets its own catalog instance and its own uuid-named cart
//! slot, so tests are independent and run in parallel.

#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::sync::Arc;

use cartwheel_core::{CartEntry, ProductId};
use cartwheel_store::cart::{CartStore, messages};
use cartwheel_store::catalog::CatalogClient;
use cartwheel_store::error::CartError;
use cartwheel_store::notify::RecordingNotifier;
use cartwheel_store::storage::JsonFileStorage;

use cartwheel_integration_tests::{MockCatalog, product, temp_slot_path};

type TestStore = CartStore<JsonFileStorage, Arc<RecordingNotifier>>;

async fn open_store(catalog: &MockCatalog, slot: &Path) -> (TestStore, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let store = CartStore::open(
        CatalogClient::new(&catalog.base_url()),
        JsonFileStorage::new(slot),
        Arc::clone(&notifier),
    )
    .await
    .unwrap();
    (store, notifier)
}

/// The persisted slot must equal the in-memory cart after every
/// successful mutation.
async fn assert_slot_matches(slot: &Path, cart: &[CartEntry]) {
    let bytes = tokio::fs::read(slot).await.unwrap();
    let persisted: Vec<CartEntry> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(persisted, cart);
}

fn amounts(cart: &[CartEntry]) -> Vec<(i64, u32)> {
    cart.iter().map(|e| (e.id.as_i64(), e.amount)).collect()
}

#[tokio::test]
async fn test_add_new_product_enters_with_amount_one() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();

    let cart = store.cart();
    assert_eq!(amounts(&cart), vec![(1, 1)]);
    assert_eq!(cart.first().unwrap().title, "Trail Runner");
    assert_slot_matches(&slot, &cart).await;
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_add_existing_product_bumps_amount_by_one() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(1)).await.unwrap();

    assert_eq!(amounts(&store.cart()), vec![(1, 2)]);
    assert_slot_matches(&slot, &store.cart()).await;
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_add_fails_when_stock_cannot_cover_bump() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();

    // Entry at 2 needs stock > 3 for another bump; 3 is not enough.
    store
        .update_product_amount(ProductId::new(1), 2)
        .await
        .unwrap();
    catalog.set_stock(ProductId::new(1), 3);

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(amounts(&store.cart()), vec![(1, 2)]);
    assert_slot_matches(&slot, &store.cart()).await;
    assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_add_with_zero_seed_amount_enters_with_one() {
    let catalog = MockCatalog::spawn().await;
    let mut zero_seeded = product(1, "Trail Runner", 16600);
    zero_seeded.amount = Some(0);
    catalog.seed(zero_seeded, 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();

    // A zero catalog seed must never reach the cart; every stored entry
    // carries a positive quantity.
    let cart = store.cart();
    assert_eq!(amounts(&cart), vec![(1, 1)]);
    assert!(cart.iter().all(|e| e.amount >= 1));
    assert_slot_matches(&slot, &cart).await;
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_add_fails_on_empty_stock() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 0);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 1,
            available: 0
        }
    ));
    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_add_unknown_product_notifies_add_failure() {
    let catalog = MockCatalog::spawn().await;
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    let err = store.add_product(ProductId::new(99)).await.unwrap_err();

    assert!(matches!(err, CartError::Catalog(_)));
    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![messages::ADD_FAILED]);
}

#[tokio::test]
async fn test_add_surfaces_catalog_outage_as_add_failure() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    catalog.set_failing(true);
    let err = store.add_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CartError::Catalog(_)));
    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![messages::ADD_FAILED]);
}

#[tokio::test]
async fn test_remove_deletes_entry_and_persists() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    catalog.seed(product(2, "Canvas Sneaker", 13990), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();

    store.remove_product(ProductId::new(1)).await.unwrap();

    assert_eq!(amounts(&store.cart()), vec![(2, 1)]);
    assert_slot_matches(&slot, &store.cart()).await;
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_remove_missing_product_fails_and_leaves_state() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();

    let err = store.remove_product(ProductId::new(7)).await.unwrap_err();

    assert!(matches!(err, CartError::NotInCart(_)));
    assert_eq!(amounts(&store.cart()), vec![(1, 1)]);
    assert_eq!(notifier.messages(), vec![messages::REMOVE_FAILED]);
}

#[tokio::test]
async fn test_remove_twice_is_an_error_not_a_mutation() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();
    store.remove_product(ProductId::new(1)).await.unwrap();

    let err = store.remove_product(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, CartError::NotInCart(_)));
    assert!(store.cart().is_empty());
    assert_slot_matches(&slot, &store.cart()).await;
    assert_eq!(notifier.messages(), vec![messages::REMOVE_FAILED]);
}

#[tokio::test]
async fn test_update_sets_exact_amount_and_preserves_position() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 10);
    catalog.seed(product(2, "Canvas Sneaker", 13990), 10);
    catalog.seed(product(3, "High Top", 17990), 10);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();
    store.add_product(ProductId::new(2)).await.unwrap();
    store.add_product(ProductId::new(3)).await.unwrap();

    store
        .update_product_amount(ProductId::new(2), 4)
        .await
        .unwrap();

    assert_eq!(amounts(&store.cart()), vec![(1, 1), (2, 4), (3, 1)]);
    assert_slot_matches(&slot, &store.cart()).await;
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_update_fails_when_stock_does_not_exceed_target() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    store.add_product(ProductId::new(1)).await.unwrap();

    // stock == target is already insufficient, the target must be strictly
    // below the available amount
    let err = store
        .update_product_amount(ProductId::new(1), 5)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(amounts(&store.cart()), vec![(1, 1)]);
    assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK]);
}

#[tokio::test]
async fn test_update_missing_product_notifies_update_failure() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    let err = store
        .update_product_amount(ProductId::new(1), 2)
        .await
        .unwrap_err();

    assert!(matches!(err, CartError::NotInCart(_)));
    assert!(store.cart().is_empty());
    assert_eq!(notifier.messages(), vec![messages::UPDATE_FAILED]);
}

#[tokio::test]
async fn test_subscribers_observe_each_successful_mutation() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, _) = open_store(&catalog, &slot).await;

    let mut rx = store.subscribe();
    assert!(rx.borrow_and_update().is_empty());

    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(amounts(&rx.borrow_and_update()), vec![(1, 1)]);

    store
        .update_product_amount(ProductId::new(1), 3)
        .await
        .unwrap();
    assert_eq!(amounts(&rx.borrow_and_update()), vec![(1, 3)]);

    // A failed mutation publishes nothing
    let _ = store.remove_product(ProductId::new(9)).await;
    assert!(!rx.has_changed().unwrap());

    store.remove_product(ProductId::new(1)).await.unwrap();
    assert!(rx.borrow_and_update().is_empty());
}

#[tokio::test]
async fn test_end_to_end_add_add_then_overreaching_update() {
    let catalog = MockCatalog::spawn().await;
    catalog.seed(product(1, "Trail Runner", 16600), 5);
    let slot = temp_slot_path();
    let (store, notifier) = open_store(&catalog, &slot).await;

    // Cart=[], stock(1)=5: add => amount 1
    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(amounts(&store.cart()), vec![(1, 1)]);

    // add again => amount 2 (5 > 1+1)
    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(amounts(&store.cart()), vec![(1, 2)]);

    // update to 5 => out of stock (5 <= 5), cart unchanged at 2
    let err = store
        .update_product_amount(ProductId::new(1), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(amounts(&store.cart()), vec![(1, 2)]);
    assert_slot_matches(&slot, &store.cart()).await;
    assert_eq!(notifier.messages(), vec![messages::OUT_OF_STOCK]);
}
