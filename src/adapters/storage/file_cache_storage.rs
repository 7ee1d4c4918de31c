//! File-based Cache Storage Adapter
//!
//! Stores each cache key as a small file under a base directory, so the
//! cache survives across CLI invocations. Keys are sanitized into file
//! names; the directory is created on first write.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{CacheStorage, CacheStorageError};

/// File-based storage for the wishlist cache
#[derive(Debug, Clone)]
pub struct FileCacheStorage {
    base_path: PathBuf,
}

impl FileCacheStorage {
    /// Create a new file storage rooted at a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileCacheStorage::new("./.cache/wishlist");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.cache", file_name))
    }
}

impl CacheStorage for FileCacheStorage {
    fn get(&self, key: &str) -> Result<Option<String>, CacheStorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheStorageError> {
        fs::create_dir_all(&self.base_path)?;

        // Write to a sibling file first so readers never see a torn value.
        let path = self.key_path(key);
        let tmp = path.with_extension("cache.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheStorageError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, FileCacheStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileCacheStorage::new(dir.path().join("wishlist"));
        (dir, storage)
    }

    #[test]
    fn set_creates_directory_and_persists() {
        let (_dir, storage) = storage();
        storage.set("wishlist_cache", "{\"snapshot\":[]}").unwrap();

        assert!(storage.base_path().exists());
        assert_eq!(
            storage.get("wishlist_cache").unwrap().as_deref(),
            Some("{\"snapshot\":[]}")
        );
    }

    #[test]
    fn get_missing_key_is_none() {
        let (_dir, storage) = storage();
        assert!(storage.get("wishlist_cache").unwrap().is_none());
    }

    #[test]
    fn separate_instances_share_files() {
        let (dir, storage) = storage();
        storage.set("k", "v").unwrap();

        let reopened = FileCacheStorage::new(dir.path().join("wishlist"));
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn remove_deletes_and_tolerates_missing() {
        let (_dir, storage) = storage();
        storage.set("k", "v").unwrap();
        storage.remove("k").unwrap();
        storage.remove("k").unwrap();

        assert!(storage.get("k").unwrap().is_none());
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let (_dir, storage) = storage();
        storage.set("wishlist_cache:count", "3").unwrap();

        assert!(storage.base_path().join("wishlist_cache_count.cache").exists());
        assert_eq!(storage.get("wishlist_cache:count").unwrap().as_deref(), Some("3"));
    }
}
