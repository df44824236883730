//! Application configuration.
//!
//! The constants are the defaults used by both the browser app and the CLI.
//! Native builds can override them from the environment (or a `.env` file)
//! with [`GalleryConfig::from_env`].

use crate::error::ConfigError;
use crate::models::ContentId;

/// Value of the `App-Name` tag written on every upload.
///
/// The gallery query filters on the same value, so changing it hides
/// everything published under the previous name.
pub const APP_NAME: &str = "Arweave Wallet Kit Demo";

/// Arweave gateway origin used for posting and for public URLs.
pub const GATEWAY_URL: &str = "https://arweave.net";

/// Number of edges requested per GraphQL page.
pub const GRAPHQL_PAGE_SIZE: u32 = 100;

/// Only this gateway status counts as a successful publish.
pub const SUCCESS_STATUS: u16 = 200;

/// How long a batch notification stays on screen (milliseconds).
pub const NOTIFICATION_MS: u32 = 9000;

/// Runtime configuration shared by the builder, orchestrator and loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Gateway origin, without trailing slash.
    pub gateway: String,
    /// `App-Name` tag value.
    pub app_name: String,
    /// GraphQL page size.
    pub page_size: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            gateway: GATEWAY_URL.to_string(),
            app_name: APP_NAME.to_string(),
            page_size: GRAPHQL_PAGE_SIZE,
        }
    }
}

impl GalleryConfig {
    /// Set the gateway origin.
    pub fn with_gateway(mut self, gateway: &str) -> Self {
        self.gateway = gateway.trim_end_matches('/').to_string();
        self
    }

    /// Set the `App-Name` tag value.
    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.app_name = app_name.to_string();
        self
    }

    /// Set the GraphQL page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Public URL of a published unit: `<gateway>/<id>`.
    pub fn url_for(&self, id: &ContentId) -> String {
        format!("{}/{}", self.gateway.trim_end_matches('/'), id)
    }

    /// Build a config from `GALLERY_GATEWAY`, `GALLERY_APP_NAME` and
    /// `GALLERY_PAGE_SIZE`, falling back to the defaults.
    #[cfg(feature = "native")]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try loading .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(gateway) = lookup("GALLERY_GATEWAY") {
            if !gateway.starts_with("http://") && !gateway.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "GALLERY_GATEWAY".into(),
                    message: format!("expected an http(s) origin, got '{}'", gateway),
                });
            }
            config = config.with_gateway(&gateway);
        }

        if let Some(app_name) = lookup("GALLERY_APP_NAME") {
            if app_name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "GALLERY_APP_NAME".into(),
                    message: "must not be empty".into(),
                });
            }
            config = config.with_app_name(&app_name);
        }

        if let Some(raw) = lookup("GALLERY_PAGE_SIZE") {
            let page_size = raw
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=100).contains(n))
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "GALLERY_PAGE_SIZE".into(),
                    message: format!("expected 1..=100, got '{}'", raw),
                })?;
            config = config.with_page_size(page_size);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GalleryConfig::default());
        assert_eq!(config.app_name, "Arweave Wallet Kit Demo");
    }

    #[test]
    fn test_overrides() {
        let config = GalleryConfig::from_lookup(lookup(&[
            ("GALLERY_GATEWAY", "http://localhost:1984/"),
            ("GALLERY_APP_NAME", "My Gallery"),
            ("GALLERY_PAGE_SIZE", "25"),
        ]))
        .unwrap();
        assert_eq!(config.gateway, "http://localhost:1984");
        assert_eq!(config.app_name, "My Gallery");
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_invalid_values() {
        assert!(GalleryConfig::from_lookup(lookup(&[("GALLERY_GATEWAY", "arweave.net")])).is_err());
        assert!(GalleryConfig::from_lookup(lookup(&[("GALLERY_PAGE_SIZE", "0")])).is_err());
        assert!(GalleryConfig::from_lookup(lookup(&[("GALLERY_APP_NAME", "  ")])).is_err());
    }

    #[test]
    fn test_url_for() {
        let config = GalleryConfig::default().with_gateway("https://g8way.io/");
        let id = ContentId::new("abc");
        assert_eq!(config.url_for(&id), "https://g8way.io/abc");
    }
}
