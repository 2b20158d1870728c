//! Error types shared across the crate.
//!
//! Information Hiding:
//! - Backend-specific failures (filesystem, SQLite, HTTP) are folded into a
//!   small set of enums so callers match on categories, not on crates

use thiserror::Error;

/// Failure of a key/value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failure to read the persisted cart
///
/// `CartStore` recovers from both variants by starting with an empty cart;
/// `load_cart` surfaces them so the failure path can be inspected.
#[derive(Debug, Error)]
pub enum CartLoadError {
    #[error("failed to read persisted cart: {0}")]
    Storage(#[from] StorageError),

    #[error("persisted cart is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failure talking to the storefront server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
