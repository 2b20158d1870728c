//! Storefront - cart store, recommendations and assistant chat
//!
//! This library provides the stateful pieces of a storefront page: a cart
//! persisted to pluggable local storage, plus thin panels over the
//! storefront server's recommendation and chat endpoints.

pub mod cart;
pub mod chat;
pub mod cli;
pub mod client;
mod config;
pub mod error;
pub mod recommendations;
pub mod search;
pub mod storage;
pub mod utils;

pub use cart::{CartStore, LineItem, Product, ProductId};
pub use chat::{ChatOutcome, ChatPanel};
pub use client::{StorefrontApi, StorefrontClient};
pub use crate::config::{
    ApiConfig, CartConfig, ChatConfig, RecommendationsConfig, Settings, StorageBackend,
    StorageConfig,
};
pub use error::{ApiError, CartLoadError, StorageError};
pub use recommendations::RecommendationsPanel;
pub use storage::{open_storage, KeyValueStorage};

use std::sync::Arc;

/// Everything a storefront page wires together at startup
///
/// Construction only builds the server client. Local storage is opened on
/// demand by [`Storefront::open_cart`], so pages without a cart never touch
/// it.
pub struct Storefront {
    pub settings: Settings,
    pub client: Arc<StorefrontClient>,
}

impl Storefront {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let client = Arc::new(StorefrontClient::from_config(&settings.api)?);

        tracing::info!("Storefront initialized against {}", settings.api.base_url);
        Ok(Self { settings, client })
    }

    /// Open the configured storage and load the cart from it
    pub fn open_cart(
        &self,
        view: Arc<dyn cart::CartView>,
        notifier: Arc<dyn cart::Notifier>,
    ) -> anyhow::Result<CartStore> {
        let storage = open_storage(&self.settings.storage)?;
        Ok(CartStore::builder(storage)
            .config(&self.settings.cart)
            .view(view)
            .notifier(notifier)
            .open())
    }

    pub fn recommendations(&self) -> RecommendationsPanel {
        RecommendationsPanel::from_config(self.client.clone(), &self.settings.recommendations)
    }

    pub fn chat(&self) -> ChatPanel {
        ChatPanel::from_config(self.client.clone(), &self.settings.chat)
    }
}
