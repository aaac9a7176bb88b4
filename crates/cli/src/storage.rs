//! File-backed cart storage: one `<key>.json` file per key.

use std::fs;
use std::path::PathBuf;

use parisa_core::cart::{CartStorage, StorageError};

/// Stores each key as a JSON file inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Write(e.to_string()))?;

        // Write then rename so a crash never leaves a half-written cart
        let target = self.path(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|e| StorageError::Write(e.to_string()))?;
        fs::rename(&staging, &target).map_err(|e| StorageError::Write(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parisa_core::cart::{CART_STORAGE_KEY, CartStore};
    use parisa_core::sanitize::CartProductInput;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("parisa-cli-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let storage = FileStorage::new(scratch_dir("missing"));
        assert!(storage.get(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_cart_persists_across_runs() {
        let dir = scratch_dir("persist");

        let mut cart = CartStore::open(FileStorage::new(&dir));
        cart.add_item(&CartProductInput {
            id: "kal-ring-001".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            price: 285_000,
            image: String::new(),
            collection: "kaleidoscope".to_string(),
        });

        let reopened = CartStore::open(FileStorage::new(&dir));
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.items()[0].id, "kal-ring-001");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_gives_empty_cart() {
        let dir = scratch_dir("corrupt");
        let storage = FileStorage::new(&dir);
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();

        let cart = CartStore::open(storage);
        assert!(cart.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
