//! Storefront Server Client
//!
//! Information Hiding:
//! - Endpoint paths and JSON envelopes hidden behind `StorefrontApi`
//! - Status and decode failures normalized into `ApiError`
//! - Panels depend on the trait, so tests can swap the server out

use crate::cart::{Product, ProductId};
use crate::config::ApiConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Product as returned by the recommendation endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl From<RecommendedProduct> for Product {
    fn from(p: RecommendedProduct) -> Self {
        Product {
            id: p.id,
            name: p.name,
            price: p.price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    #[serde(default)]
    recommendations: Option<Vec<RecommendedProduct>>,
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    trending: Option<Vec<RecommendedProduct>>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// Server endpoints the storefront page talks to
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/recommend/{id}`; a missing or null list is empty
    async fn recommendations(
        &self,
        product_id: &ProductId,
        limit: Option<u32>,
    ) -> Result<Vec<RecommendedProduct>, ApiError>;

    /// `GET /api/trending`
    async fn trending(&self, limit: Option<u32>) -> Result<Vec<RecommendedProduct>, ApiError>;

    /// `POST /api/chat` with `{message}`, returning the `response` field
    async fn chat(&self, message: &str) -> Result<String, ApiError>;
}

/// reqwest-backed client rooted at the storefront base URL
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
}

impl StorefrontClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::new(),
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        limit: Option<u32>,
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path)?;
        if let Some(limit) = limit {
            url.query_pairs_mut().append_pair("limit", &limit.to_string());
        }

        tracing::debug!("[StorefrontClient] GET {}", url);
        let response = self.client.get(url).send().await?;
        decode(response).await
    }
}

/// Ensure a trailing slash so `join` appends instead of replacing the last segment
fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        tracing::warn!("[StorefrontClient] {} returned {}", url, status);
        return Err(ApiError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl StorefrontApi for StorefrontClient {
    async fn recommendations(
        &self,
        product_id: &ProductId,
        limit: Option<u32>,
    ) -> Result<Vec<RecommendedProduct>, ApiError> {
        let path = format!("api/recommend/{}", product_id);
        let body: RecommendResponse = self.get_json(&path, limit).await?;
        Ok(body.recommendations.unwrap_or_default())
    }

    async fn trending(&self, limit: Option<u32>) -> Result<Vec<RecommendedProduct>, ApiError> {
        let body: TrendingResponse = self.get_json("api/trending", limit).await?;
        Ok(body.trending.unwrap_or_default())
    }

    async fn chat(&self, message: &str) -> Result<String, ApiError> {
        let url = self.endpoint("api/chat")?;
        tracing::debug!("[StorefrontClient] POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let body: ChatResponse = decode(response).await?;
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = StorefrontClient::new("http://shop.local/store").unwrap();
        let url = client.endpoint("api/chat").unwrap();
        assert_eq!(url.as_str(), "http://shop.local/store/api/chat");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            StorefrontClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_recommend_response_tolerates_missing_list() {
        let body: RecommendResponse = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert!(body.recommendations.is_none());

        let body: RecommendResponse =
            serde_json::from_str(r#"{"recommendations": null, "count": 0}"#).unwrap();
        assert!(body.recommendations.is_none());
    }

    #[test]
    fn test_recommended_product_without_thumbnail() {
        let p: RecommendedProduct =
            serde_json::from_str(r#"{"id": 4, "name": "Scarf", "price": 45.0}"#).unwrap();
        assert_eq!(p.thumbnail_url, None);

        let product = Product::from(p);
        assert_eq!(product.id, ProductId::Number(4));
    }
}
