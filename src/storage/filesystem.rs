//! File System Storage
//!
//! Information Hiding:
//! - File paths and on-disk layout hidden from users
//! - Directory structure management hidden behind interface
//! - Values are written through a temporary file and renamed into place

use super::{validate_key, KeyValueStorage};
use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// File system storage - each key is a JSON file
/// Files are stored as {base_path}/{key}.json
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileSystemStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;
        let path = self.item_path(key);

        if !path.exists() {
            tracing::debug!("[FileSystemStorage] '{}' does not exist", key);
            return Ok(None);
        }

        let value = fs::read_to_string(&path)?;
        tracing::debug!("[FileSystemStorage] Read {} bytes from {:?}", value.len(), path);
        Ok(Some(value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.item_path(key);
        let tmp = self.base_path.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::debug!("[FileSystemStorage] Wrote {} bytes to {:?}", value.len(), path);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        let path = self.item_path(key);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("[FileSystemStorage] Removed {:?}", path);
        } else {
            tracing::debug!("[FileSystemStorage] '{}' does not exist, nothing to remove", key);
        }

        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                    if !key.starts_with('.') {
                        keys.push(key.to_string());
                    }
                }
            }
        }

        tracing::debug!("[FileSystemStorage] Listed {} keys", keys.len());
        Ok(keys)
    }
}
