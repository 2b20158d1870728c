//! Cart Store - the page's authoritative cart
//!
//! Information Hiding:
//! - Storage key and JSON encoding hidden from callers
//! - Every mutation is followed by persist + render, callers never sequence them
//! - Malformed persisted data is recovered from here, not by the caller

use super::view::{CartView, Detached, Notifier};
use super::{is_valid_price, Cart, LineItem, Product, ProductId};
use crate::config::{CartConfig, DEFAULT_ADDED_MESSAGE, DEFAULT_STORAGE_KEY};
use crate::error::{CartLoadError, StorageError};
use crate::storage::KeyValueStorage;
use serde::Deserialize;
use std::sync::Arc;

/// A persisted entry before the cart invariants are applied
///
/// Quantity is read as a signed integer so that a negative value drops one
/// entry instead of failing the whole array.
#[derive(Deserialize)]
struct StoredLineItem {
    id: ProductId,
    name: String,
    price: f64,
    quantity: i64,
}

impl StoredLineItem {
    fn into_line_item(self) -> Option<LineItem> {
        if self.quantity <= 0 || !is_valid_price(self.price) {
            return None;
        }
        Some(LineItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity: u32::try_from(self.quantity).unwrap_or(u32::MAX),
        })
    }
}

/// Read and decode the cart stored under `key`
///
/// A missing key is an empty cart and a value that is not a JSON array is
/// `Malformed`. Individual entries that fail to decode or violate the cart
/// invariants are dropped with a warning; the rest are kept.
pub fn load_cart(storage: &dyn KeyValueStorage, key: &str) -> Result<Cart, CartLoadError> {
    let Some(json) = storage.get_item(key)? else {
        return Ok(Cart::new());
    };

    let entries: Vec<serde_json::Value> = serde_json::from_str(&json)?;
    let total = entries.len();
    let items: Vec<LineItem> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<StoredLineItem>(entry).ok())
        .filter_map(StoredLineItem::into_line_item)
        .collect();
    let (cart, _) = Cart::from_items(items);
    let dropped = total - cart.len();
    if dropped > 0 {
        tracing::warn!(
            "[CartStore] Dropped {} invalid entries from persisted cart '{}'",
            dropped,
            key
        );
    }

    Ok(cart)
}

pub struct CartStoreBuilder {
    storage: Arc<dyn KeyValueStorage>,
    view: Arc<dyn CartView>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    added_message: String,
}

impl CartStoreBuilder {
    pub fn view(mut self, view: Arc<dyn CartView>) -> Self {
        self.view = view;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn added_message(mut self, message: impl Into<String>) -> Self {
        self.added_message = message.into();
        self
    }

    /// Apply the `[cart]` configuration section
    pub fn config(self, config: &CartConfig) -> Self {
        self.storage_key(config.storage_key.clone())
            .added_message(config.added_message.clone())
    }

    /// Load the persisted cart and render the initial count
    ///
    /// Never fails: unreadable or malformed data starts an empty cart.
    pub fn open(self) -> CartStore {
        let cart = match load_cart(self.storage.as_ref(), &self.storage_key) {
            Ok(cart) => cart,
            Err(e) => {
                tracing::warn!(
                    "[CartStore] Ignoring persisted cart '{}': {}",
                    self.storage_key,
                    e
                );
                Cart::new()
            }
        };

        tracing::debug!(
            "[CartStore] Opened cart '{}' with {} line items",
            self.storage_key,
            cart.len()
        );

        let store = CartStore {
            cart,
            storage: self.storage,
            view: self.view,
            notifier: self.notifier,
            storage_key: self.storage_key,
            added_message: self.added_message,
        };
        store.render();
        store
    }
}

/// Cart state plus its persistence and display side effects
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStorage>,
    view: Arc<dyn CartView>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    added_message: String,
}

impl CartStore {
    pub fn builder(storage: Arc<dyn KeyValueStorage>) -> CartStoreBuilder {
        CartStoreBuilder {
            storage,
            view: Arc::new(Detached),
            notifier: Arc::new(Detached),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            added_message: DEFAULT_ADDED_MESSAGE.to_string(),
        }
    }

    /// Open with default key, no view and no notices
    pub fn open(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::builder(storage).open()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.cart.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Add one unit of `product`, then persist, render and post the notice
    ///
    /// A product whose price is not a finite, non-negative number is
    /// rejected: nothing changes and no notice is shown.
    pub fn add_item(&mut self, product: Product) -> Result<(), StorageError> {
        tracing::info!("[CartStore] Adding product {} ({})", product.id, product.name);
        if !self.cart.add(product) {
            tracing::warn!("[CartStore] Rejected product with invalid price");
            return Ok(());
        }
        let result = self.commit();
        self.notify(&self.added_message);
        result
    }

    /// Removing an id that is not in the cart is a no-op
    pub fn remove_item(&mut self, id: &ProductId) -> Result<(), StorageError> {
        if self.cart.remove(id).is_some() {
            tracing::info!("[CartStore] Removed product {}", id);
        }
        self.commit()
    }

    /// Set a quantity; `quantity <= 0` removes the entry
    ///
    /// Persists and re-renders even when `id` is not in the cart.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), StorageError> {
        if self.cart.set_quantity(id, quantity) {
            tracing::info!("[CartStore] Set quantity of product {} to {}", id, quantity);
        } else {
            tracing::debug!("[CartStore] Product {} not in cart, quantity unchanged", id);
        }
        self.commit()
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        tracing::info!("[CartStore] Cleared cart '{}'", self.storage_key);
        self.commit()
    }

    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Push the current item count to the view
    pub fn render(&self) {
        self.view.render(self.cart.item_count());
    }

    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    /// Persist the whole cart, then render regardless of the write outcome
    fn commit(&self) -> Result<(), StorageError> {
        let result = self.persist();
        if let Err(e) = &result {
            tracing::error!("[CartStore] Failed to persist cart '{}': {}", self.storage_key, e);
        }
        self.render();
        result
    }

    fn persist(&self) -> Result<(), StorageError> {
        // Prices are checked on add and load, so every number here is finite
        let json = serde_json::to_string(&self.cart).unwrap_or_else(|_| "[]".to_string());
        self.storage.set_item(&self.storage_key, &json)
    }
}
