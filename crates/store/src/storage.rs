//! Durable cart slot.
//!
//! The cart lives in a single named slot holding the JSON-serialized entry
//! sequence: read once when the store opens, overwritten wholesale after
//! every successful mutation.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cartwheel_core::CartEntry;

use crate::error::StorageError;

/// Seam over the durable slot holding the serialized cart.
pub trait CartStorage: Send + Sync {
    /// Read the persisted cart. `None` when the slot has never been written.
    fn load(&self) -> impl Future<Output = Result<Option<Vec<CartEntry>>, StorageError>> + Send;

    /// Overwrite the slot with the given cart.
    fn save(&self, cart: &[CartEntry]) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// JsonFileStorage
// =============================================================================

/// File-backed slot via `tokio::fs`.
///
/// A missing file loads as `None`; unparseable content is reported as
/// [`StorageError::Corrupt`] so the store can decide how to recover.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a slot backed by the given file path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<Vec<CartEntry>>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let cart = serde_json::from_slice(&bytes).map_err(StorageError::Corrupt)?;
        Ok(Some(cart))
    }

    async fn save(&self, cart: &[CartEntry]) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(cart).map_err(StorageError::Serialize)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-process slot for tests and embedding.
///
/// As a test double it panics on a poisoned lock rather than masking a
/// crash elsewhere with a silent success.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<Vec<CartEntry>>>,
}

impl MemoryStorage {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot pre-seeded with a cart.
    #[must_use]
    pub fn seeded(cart: Vec<CartEntry>) -> Self {
        Self {
            slot: Mutex::new(Some(cart)),
        }
    }

    /// Snapshot of the slot contents (test assertions).
    ///
    /// # Panics
    ///
    /// Panics if the slot lock is poisoned.
    #[must_use]
    pub fn contents(&self) -> Option<Vec<CartEntry>> {
        self.slot.lock().expect("cart slot lock poisoned").clone()
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<Vec<CartEntry>>, StorageError> {
        Ok(self.slot.lock().expect("cart slot lock poisoned").clone())
    }

    async fn save(&self, cart: &[CartEntry]) -> Result<(), StorageError> {
        *self.slot.lock().expect("cart slot lock poisoned") = Some(cart.to_vec());
        Ok(())
    }
}
