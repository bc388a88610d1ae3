//! Client configuration
//!
//! Loaded from YAML; every field has a default so an empty document is a
//! valid configuration pointing at a local backend.

use crate::cache::QueryClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{Entity, StringMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete storefront client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Backend origin, e.g. `https://shop.example.com/api`
    pub base_url: String,

    /// Prefix for every endpoint path
    pub api_path: String,

    /// Cached data older than this is refetched on next access
    pub stale_time_secs: u64,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Transport retries for retryable failures (0 = propagate immediately)
    pub max_retries: u32,

    /// Products per infinite page
    pub product_page_size: u32,

    /// Posts per infinite page
    pub post_page_size: u32,

    /// Client-side request throttling
    pub rate_limit: Option<RateLimiterConfig>,

    /// Headers sent with every request
    pub headers: StringMap,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_path: "user/".to_string(),
            stale_time_secs: 5 * 60,
            timeout_secs: 30,
            max_retries: 0,
            product_page_size: Entity::Products.default_page_size(),
            post_page_size: Entity::Posts.default_page_size(),
            rate_limit: None,
            headers: StringMap::new(),
        }
    }
}

impl StorefrontConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.product_page_size == 0 || self.post_page_size == 0 {
            return Err(Error::config("page sizes must be greater than zero"));
        }
        Ok(())
    }

    /// Transport settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries);
        if let Some(rate_limit) = &self.rate_limit {
            builder = builder.rate_limit(rate_limit.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        builder.build()
    }

    /// Cache settings
    pub fn query_client_config(&self) -> QueryClientConfig {
        QueryClientConfig::builder()
            .stale_time(Duration::from_secs(self.stale_time_secs))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api_path, "user/");
        assert_eq!(config.stale_time_secs, 300);
        assert_eq!(config.product_page_size, 9);
        assert_eq!(config.post_page_size, 6);
        assert_eq!(config.max_retries, 0);
        assert_eq!(
            config.query_client_config().stale_time,
            Duration::from_secs(300)
        );
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            StorefrontConfig::from_yaml_str("").unwrap(),
            StorefrontConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = StorefrontConfig::from_yaml_str(
            r"
base_url: https://shop.example.com/api
stale_time_secs: 60
rate_limit:
  requests_per_second: 5
headers:
  X-Store: eu
",
        )
        .unwrap();

        assert_eq!(config.base_url, "https://shop.example.com/api");
        assert_eq!(config.stale_time_secs, 60);
        assert_eq!(config.api_path, "user/");
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 10)));

        let http = config.http_config();
        assert_eq!(
            http.base_url.as_deref(),
            Some("https://shop.example.com/api")
        );
        assert_eq!(http.default_headers.get("X-Store"), Some(&"eu".to_string()));
        assert!(http.rate_limit.is_some());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(StorefrontConfig::from_yaml_str("base_url: not a url").is_err());
        assert!(StorefrontConfig::from_yaml_str("product_page_size: 0").is_err());
        assert!(StorefrontConfig::from_yaml_str("stale_time_secs: [1]").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "post_page_size: 12").unwrap();

        let config = StorefrontConfig::from_file(file.path()).unwrap();
        assert_eq!(config.post_page_size, 12);
    }

    #[test]
    fn test_missing_file() {
        let err = StorefrontConfig::from_file("/nonexistent/storefront.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
