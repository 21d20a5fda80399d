//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod stock;

pub use id::ProductId;
pub use price::Price;
pub use product::{CartEntry, CatalogProduct};
pub use stock::StockLevel;
