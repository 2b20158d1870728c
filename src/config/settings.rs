use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub cart: CartConfig,
    pub recommendations: RecommendationsConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Filesystem,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConfig {
    pub storage_key: String,
    pub added_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    pub limit: u32,
    pub placeholder_image: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub fallback_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

pub const DEFAULT_STORAGE_KEY: &str = "cart";
pub const DEFAULT_ADDED_MESSAGE: &str = "تم إضافة المنتج إلى السلة";
pub const DEFAULT_FALLBACK_MESSAGE: &str = "معلش حصل مشكلة صغيرة، ممكن تجربي تاني؟ 😅";
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.png";
pub const DEFAULT_CURRENCY: &str = "ر.س";

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        Self::defaults()?
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Built-in values only, ignoring files and environment
    pub fn built_in() -> Result<Self, ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", "http://localhost:5000")?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.path", "./storefront-data")?
            .set_default("cart.storage_key", DEFAULT_STORAGE_KEY)?
            .set_default("cart.added_message", DEFAULT_ADDED_MESSAGE)?
            .set_default("recommendations.limit", 4_i64)?
            .set_default("recommendations.placeholder_image", DEFAULT_PLACEHOLDER_IMAGE)?
            .set_default("recommendations.currency", DEFAULT_CURRENCY)?
            .set_default("chat.fallback_message", DEFAULT_FALLBACK_MESSAGE)?
            .set_default("logging.level", "info")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_defaults() {
        let settings = Settings::built_in().unwrap();

        assert_eq!(settings.api.base_url, "http://localhost:5000");
        assert_eq!(settings.api.timeout_secs, None);
        assert_eq!(settings.storage.backend, StorageBackend::Filesystem);
        assert_eq!(settings.cart.storage_key, "cart");
        assert_eq!(settings.recommendations.limit, 4);
        assert_eq!(settings.chat.fallback_message, DEFAULT_FALLBACK_MESSAGE);
    }
}
