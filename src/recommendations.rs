//! Recommendations Panel
//!
//! Turns recommended products into display cards. Failures are logged here
//! and still returned, so a page can render nothing while tests can see why.

use crate::cart::ProductId;
use crate::client::{RecommendedProduct, StorefrontApi};
use crate::config::{RecommendationsConfig, DEFAULT_CURRENCY, DEFAULT_PLACEHOLDER_IMAGE};
use crate::error::ApiError;
use std::sync::Arc;

/// One rendered product card
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub product_id: ProductId,
    pub href: String,
    pub image_url: String,
    pub alt: String,
    pub title: String,
    pub price_label: String,
    pub price: f64,
}

pub struct RecommendationsPanel {
    api: Arc<dyn StorefrontApi>,
    limit: Option<u32>,
    placeholder_image: String,
    currency: String,
}

impl RecommendationsPanel {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            limit: None,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn from_config(api: Arc<dyn StorefrontApi>, config: &RecommendationsConfig) -> Self {
        Self {
            api,
            limit: Some(config.limit),
            placeholder_image: config.placeholder_image.clone(),
            currency: config.currency.clone(),
        }
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Cards for products related to `product_id`
    pub async fn load(&self, product_id: &ProductId) -> Result<Vec<ProductCard>, ApiError> {
        match self.api.recommendations(product_id, self.limit).await {
            Ok(products) => {
                tracing::debug!(
                    "[Recommendations] {} recommendations for product {}",
                    products.len(),
                    product_id
                );
                Ok(self.cards(&products))
            }
            Err(e) => {
                tracing::error!("Error loading recommendations for {}: {}", product_id, e);
                Err(e)
            }
        }
    }

    pub async fn load_trending(&self) -> Result<Vec<ProductCard>, ApiError> {
        match self.api.trending(self.limit).await {
            Ok(products) => Ok(self.cards(&products)),
            Err(e) => {
                tracing::error!("Error loading trending products: {}", e);
                Err(e)
            }
        }
    }

    pub fn cards(&self, products: &[RecommendedProduct]) -> Vec<ProductCard> {
        products.iter().map(|p| self.card(p)).collect()
    }

    fn card(&self, product: &RecommendedProduct) -> ProductCard {
        let image_url = product
            .thumbnail_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(self.placeholder_image.as_str())
            .to_string();

        ProductCard {
            product_id: product.id.clone(),
            href: format!("/product/{}", product.id),
            image_url,
            alt: product.name.clone(),
            title: product.name.clone(),
            price_label: format!("{} {}", product.price, self.currency),
            price: product.price,
        }
    }
}
