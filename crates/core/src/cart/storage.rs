//! Key-value persistence for the cart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Key under which the cart's JSON is stored.
pub const CART_STORAGE_KEY: &str = "parisa-cart";

/// Errors writing to cart storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage unavailable")]
    Unavailable,
}

/// String key-value store holding the serialized cart.
///
/// Reads are infallible by contract: anything unreadable is reported as
/// missing and the cart starts empty.
pub trait CartStorage {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .map_err(|_| StorageError::Unavailable)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
