//! File-backed key-value store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Key-value store keeping one JSON document per key under a directory.
///
/// Writes go to a temp file first and are renamed into place, so each
/// mutation is atomic from the reader's point of view.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a file store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("clementine-{name}-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_set_get_round_trip() {
        let dir = scratch_dir("file-store");
        let store = FileStore::open(&dir).unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
        store.set("cart", "[1,2,3]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[1,2,3]"));

        // Overwrite replaces the previous value
        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = scratch_dir("file-store-remove");
        let store = FileStore::open(&dir).unwrap();

        store.set("theme", "\"dark\"").unwrap();
        store.remove("theme").unwrap();
        assert_eq!(store.get("theme").unwrap(), None);

        // Removing an absent key is a no-op
        store.remove("theme").unwrap();

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_keys_are_independent() {
        let dir = scratch_dir("file-store-keys");
        let store = FileStore::open(&dir).unwrap();

        store.set("cart", "[\"a\"]").unwrap();
        store.set("wishlist", "[\"b\"]").unwrap();
        store.remove("cart").unwrap();

        assert_eq!(store.get("cart").unwrap(), None);
        assert_eq!(store.get("wishlist").unwrap().as_deref(), Some("[\"b\"]"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
