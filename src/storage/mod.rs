//! Key/Value Storage Abstraction
//!
//! Information Hiding:
//! - Storage backend implementation details hidden behind trait
//! - Allows swapping between memory, filesystem and SQLite without touching the cart
//! - Each backend encapsulates its own data structures and file formats
//!
//! The interface mirrors browser local storage: string values under string
//! keys, each value overwritten wholesale.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::StorageError;
use std::sync::Arc;

pub mod filesystem;
pub mod memory;
pub mod sqlite;

pub use filesystem::FileSystemStorage;
pub use memory::InMemoryStorage;
pub use sqlite::SqliteStorage;

/// Trait defining the local storage interface
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`
    /// Returns `None` if the key has never been written
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// List all keys currently stored
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Check if a key exists
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get_item(key)?.is_some())
    }
}

/// Open the backend selected in configuration
pub fn open_storage(config: &StorageConfig) -> Result<Arc<dyn KeyValueStorage>, StorageError> {
    let storage: Arc<dyn KeyValueStorage> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
        StorageBackend::Filesystem => Arc::new(FileSystemStorage::new(&config.path)?),
        StorageBackend::Sqlite => Arc::new(SqliteStorage::open(&config.path)?),
    };

    tracing::debug!("[Storage] Opened {:?} backend at {:?}", config.backend, config.path);
    Ok(storage)
}

/// Keys end up in file names and SQL rows; keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
