//! Storefront configuration.
//!
//! Loaded once by the top-level caller and passed down by reference; nothing
//! in this crate fetches configuration on its own.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`StorefrontConfig::site_url`].
pub const SITE_URL_ENV: &str = "BOTTEGA_SITE_URL";

/// Contact details shown in the footer and contact page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiktok: Option<String>,
}

impl SiteConfig {
    /// Social links that are set, as `(network, url)`.
    pub fn social_links(&self) -> Vec<(&'static str, &str)> {
        [
            ("instagram", self.instagram.as_deref()),
            ("facebook", self.facebook.as_deref()),
            ("tiktok", self.tiktok.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.filter(|u| !u.is_empty()).map(|u| (name, u)))
        .collect()
    }
}

/// Settings the storefront needs at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Public origin used to build share links.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Currency code handed to the cart widget.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Image used for cart items whose product has no pictures.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Label for a ticked checkbox in the cart.
    #[serde(default = "default_yes_label")]
    pub yes_label: String,

    /// Label for an unticked checkbox.
    #[serde(default = "default_no_label")]
    pub no_label: String,

    /// Maximum number of results of a text search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Default log filter.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Catalog JSON document for the file-backed store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,

    /// Contact details.
    #[serde(default)]
    pub site: SiteConfig,
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_currency() -> String {
    "eur".to_string()
}

fn default_placeholder_image() -> String {
    "/handmade-product.png".to_string()
}

fn default_yes_label() -> String {
    "Sì".to_string()
}

fn default_no_label() -> String {
    "No".to_string()
}

fn default_search_limit() -> usize {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            currency: default_currency(),
            placeholder_image: default_placeholder_image(),
            yes_label: default_yes_label(),
            no_label: default_no_label(),
            search_limit: default_search_limit(),
            log_level: default_log_level(),
            catalog_path: None,
            site: SiteConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load config from a file; JSON if the name ends in `.json`, TOML
    /// otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, CommerceError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Apply overrides from the environment.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SITE_URL_ENV) {
            if !url.is_empty() {
                self.site_url = url;
            }
        }
        self
    }

    /// `site_url` without a trailing slash.
    pub fn origin(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// Localized label for a checkbox value.
    pub fn bool_label(&self, value: bool) -> &str {
        if value {
            &self.yes_label
        } else {
            &self.no_label
        }
    }
}
