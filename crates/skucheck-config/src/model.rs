//! Typed configuration models and override documents.
//!
//! # Design
//! - `*Overrides` are partial documents (file or environment); every field is
//!   optional and later sources win during `merge`.
//! - `SkuCheckConfig` is only produced by `resolve`, so holders can rely on
//!   validated values.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{
    DEFAULT_AIRTABLE_API_URL, DEFAULT_BASE_ID, DEFAULT_DRIVE_API_URL, DEFAULT_LINKED_TABLE,
    DEFAULT_PAGE_SIZE, DEFAULT_PRODUCT_TABLE, DEFAULT_TIMEOUT_SECS,
};
use crate::error::ConfigResult;
use crate::validate::{parse_url, require_non_empty, validate_page_size, validate_timeout};

/// Record store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordStoreConfig {
    /// REST root, e.g. `https://api.airtable.com/v0`.
    pub api_url: Url,
    /// Base identifier.
    pub base_id: String,
    /// Product table identifier.
    pub product_table: String,
    /// Linked raw-data table identifier.
    pub linked_table: String,
}

/// File storage location and listing limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageConfig {
    /// REST root, e.g. `https://www.googleapis.com`.
    pub api_url: Url,
    /// Maximum files returned per listing.
    pub page_size: u32,
}

/// HTTP client settings shared by both adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Validated configuration for the whole workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkuCheckConfig {
    /// Record store settings.
    pub record_store: RecordStoreConfig,
    /// File storage settings.
    pub storage: StorageConfig,
    /// HTTP settings.
    pub http: HttpConfig,
}

impl SkuCheckConfig {
    /// Built-in defaults.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the error path exists because defaults go
    /// through the same validation as user input.
    pub fn defaults() -> ConfigResult<Self> {
        ConfigOverrides::default().resolve()
    }
}

/// Partial record store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordStoreOverrides {
    /// REST root.
    pub api_url: Option<String>,
    /// Base identifier.
    pub base_id: Option<String>,
    /// Product table identifier.
    pub product_table: Option<String>,
    /// Linked table identifier.
    pub linked_table: Option<String>,
}

/// Partial storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageOverrides {
    /// REST root.
    pub api_url: Option<String>,
    /// Listing page size.
    pub page_size: Option<u32>,
}

/// Partial HTTP settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpOverrides {
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Partial configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    /// Record store section.
    pub record_store: RecordStoreOverrides,
    /// Storage section.
    pub storage: StorageOverrides,
    /// HTTP section.
    pub http: HttpOverrides,
}

impl ConfigOverrides {
    /// Layer `other` on top of `self`; populated fields in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            record_store: RecordStoreOverrides {
                api_url: other.record_store.api_url.or(self.record_store.api_url),
                base_id: other.record_store.base_id.or(self.record_store.base_id),
                product_table: other
                    .record_store
                    .product_table
                    .or(self.record_store.product_table),
                linked_table: other
                    .record_store
                    .linked_table
                    .or(self.record_store.linked_table),
            },
            storage: StorageOverrides {
                api_url: other.storage.api_url.or(self.storage.api_url),
                page_size: other.storage.page_size.or(self.storage.page_size),
            },
            http: HttpOverrides {
                timeout_secs: other.http.timeout_secs.or(self.http.timeout_secs),
            },
        }
    }

    /// Fill gaps with defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::InvalidField`] for unparsable URLs, blank
    /// identifiers, or out-of-range limits.
    pub fn resolve(self) -> ConfigResult<SkuCheckConfig> {
        let record_store = RecordStoreConfig {
            api_url: parse_url(
                "record_store.api_url",
                self.record_store
                    .api_url
                    .as_deref()
                    .unwrap_or(DEFAULT_AIRTABLE_API_URL),
            )?,
            base_id: require_non_empty(
                "record_store.base_id",
                self.record_store.base_id.as_deref().unwrap_or(DEFAULT_BASE_ID),
            )?,
            product_table: require_non_empty(
                "record_store.product_table",
                self.record_store
                    .product_table
                    .as_deref()
                    .unwrap_or(DEFAULT_PRODUCT_TABLE),
            )?,
            linked_table: require_non_empty(
                "record_store.linked_table",
                self.record_store
                    .linked_table
                    .as_deref()
                    .unwrap_or(DEFAULT_LINKED_TABLE),
            )?,
        };
        let storage = StorageConfig {
            api_url: parse_url(
                "storage.api_url",
                self.storage.api_url.as_deref().unwrap_or(DEFAULT_DRIVE_API_URL),
            )?,
            page_size: validate_page_size(self.storage.page_size.unwrap_or(DEFAULT_PAGE_SIZE))?,
        };
        let http = HttpConfig {
            timeout_secs: validate_timeout(self.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))?,
        };
        Ok(SkuCheckConfig {
            record_store,
            storage,
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use anyhow::Result;

    #[test]
    fn defaults_resolve_to_known_endpoints() -> Result<()> {
        let config = SkuCheckConfig::defaults()?;
        assert_eq!(config.record_store.base_id, DEFAULT_BASE_ID);
        assert_eq!(config.record_store.api_url.as_str(), "https://api.airtable.com/v0");
        assert_eq!(config.storage.page_size, 100);
        assert_eq!(config.http.timeout(), Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn merge_prefers_later_layer() {
        let file = ConfigOverrides {
            record_store: RecordStoreOverrides {
                base_id: Some("appFile".into()),
                product_table: Some("tblFile".into()),
                ..RecordStoreOverrides::default()
            },
            ..ConfigOverrides::default()
        };
        let env = ConfigOverrides {
            record_store: RecordStoreOverrides {
                base_id: Some("appEnv".into()),
                ..RecordStoreOverrides::default()
            },
            ..ConfigOverrides::default()
        };
        let merged = file.merge(env);
        assert_eq!(merged.record_store.base_id.as_deref(), Some("appEnv"));
        assert_eq!(merged.record_store.product_table.as_deref(), Some("tblFile"));
    }

    #[test]
    fn resolve_rejects_blank_identifiers() {
        let overrides = ConfigOverrides {
            record_store: RecordStoreOverrides {
                linked_table: Some("  ".into()),
                ..RecordStoreOverrides::default()
            },
            ..ConfigOverrides::default()
        };
        assert!(matches!(
            overrides.resolve(),
            Err(ConfigError::InvalidField {
                field: "record_store.linked_table",
                ..
            })
        ));
    }

    #[test]
    fn document_rejects_unknown_sections() {
        let parsed = serde_json::from_str::<ConfigOverrides>(r#"{"metrics": {}}"#);
        assert!(parsed.is_err());
    }
}
