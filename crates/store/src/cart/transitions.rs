//! Pure cart transitions.
//!
//! Given the current entry sequence and the inputs, these produce the next
//! sequence (or nothing, when the target entry is absent) without touching
//! storage or the network. The store layers stock checks, persistence, and
//! publication on top.

use cartwheel_core::{CartEntry, ProductId};

/// Look up the entry for a product.
pub fn find_entry(cart: &[CartEntry], product_id: ProductId) -> Option<&CartEntry> {
    cart.iter().find(|entry| entry.id == product_id)
}

/// Cart with a new entry appended. Callers guarantee uniqueness.
pub fn with_new_entry(cart: &[CartEntry], entry: CartEntry) -> Vec<CartEntry> {
    debug_assert!(find_entry(cart, entry.id).is_none());

    let mut next = cart.to_vec();
    next.push(entry);
    next
}

/// Cart with the given entry's amount replaced, position preserved.
/// `None` when the product has no entry.
pub fn with_entry_amount(
    cart: &[CartEntry],
    product_id: ProductId,
    amount: u32,
) -> Option<Vec<CartEntry>> {
    find_entry(cart, product_id)?;

    Some(
        cart.iter()
            .map(|entry| {
                if entry.id == product_id {
                    let mut updated = entry.clone();
                    updated.amount = amount;
                    updated
                } else {
                    entry.clone()
                }
            })
            .collect(),
    )
}

/// Cart with the given entry removed. `None` when the product has no entry.
pub fn without_entry(cart: &[CartEntry], product_id: ProductId) -> Option<Vec<CartEntry>> {
    find_entry(cart, product_id)?;

    Some(
        cart.iter()
            .filter(|entry| entry.id != product_id)
            .cloned()
            .collect(),
    )
}
