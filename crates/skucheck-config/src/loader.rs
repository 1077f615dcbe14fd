//! Configuration loading from files and the environment.
//!
//! # Design
//! - Precedence: built-in defaults, then the JSON file, then `SKUCHECK_*`
//!   environment variables.
//! - The environment is read through a lookup closure so tests never touch the
//!   process environment.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    ConfigOverrides, HttpOverrides, RecordStoreOverrides, SkuCheckConfig, StorageOverrides,
};

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "SKUCHECK_";

const AIRTABLE_API_URL: &str = "AIRTABLE_API_URL";
const AIRTABLE_BASE_ID: &str = "AIRTABLE_BASE_ID";
const AIRTABLE_PRODUCT_TABLE: &str = "AIRTABLE_PRODUCT_TABLE";
const AIRTABLE_LINKED_TABLE: &str = "AIRTABLE_LINKED_TABLE";
const DRIVE_API_URL: &str = "DRIVE_API_URL";
const DRIVE_PAGE_SIZE: &str = "DRIVE_PAGE_SIZE";
const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";

impl ConfigOverrides {
    /// Build overrides from `SKUCHECK_*` variables supplied by `lookup`.
    ///
    /// `lookup` receives the full variable name; blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a numeric variable does not
    /// parse.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |suffix: &str| {
            lookup(&format!("{ENV_PREFIX}{suffix}"))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        Ok(Self {
            record_store: RecordStoreOverrides {
                api_url: read(AIRTABLE_API_URL),
                base_id: read(AIRTABLE_BASE_ID),
                product_table: read(AIRTABLE_PRODUCT_TABLE),
                linked_table: read(AIRTABLE_LINKED_TABLE),
            },
            storage: StorageOverrides {
                api_url: read(DRIVE_API_URL),
                page_size: read(DRIVE_PAGE_SIZE)
                    .map(|raw| parse_number("storage.page_size", &raw))
                    .transpose()?,
            },
            http: HttpOverrides {
                timeout_secs: read(HTTP_TIMEOUT_SECS)
                    .map(|raw| parse_number("http.timeout_secs", &raw))
                    .transpose()?,
            },
        })
    }

    /// Build overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ConfigOverrides::from_lookup`].
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Parse a JSON override document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when it is malformed or carries unknown keys.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            operation: "config.read",
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&payload).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SkuCheckConfig {
    /// Defaults with `SKUCHECK_*` overrides supplied by `lookup`.
    ///
    /// # Errors
    ///
    /// Propagates parse and validation errors.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        load(None, lookup)
    }

    /// Defaults with overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Propagates parse and validation errors.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> ConfigResult<T> {
    raw.parse().map_err(|_| ConfigError::InvalidField {
        field,
        value: Some(raw.to_string()),
        reason: "must be a positive integer",
    })
}

/// Resolve the effective configuration.
///
/// # Errors
///
/// Propagates file, parse, and validation errors from each layer.
pub fn load<F>(path: Option<&Path>, lookup: F) -> ConfigResult<SkuCheckConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration file");
            ConfigOverrides::from_json_file(path)?
        }
        None => ConfigOverrides::default(),
    };
    let env = ConfigOverrides::from_lookup(lookup)?;
    file.merge(env).resolve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_values_are_prefixed_and_trimmed() -> ConfigResult<()> {
        let overrides = ConfigOverrides::from_lookup(lookup_from(&[
            ("SKUCHECK_AIRTABLE_BASE_ID", " appEnv "),
            ("SKUCHECK_DRIVE_PAGE_SIZE", "25"),
            ("SKUCHECK_HTTP_TIMEOUT_SECS", ""),
            ("AIRTABLE_PRODUCT_TABLE", "ignored"),
        ]))?;
        assert_eq!(overrides.record_store.base_id.as_deref(), Some("appEnv"));
        assert_eq!(overrides.record_store.product_table, None);
        assert_eq!(overrides.storage.page_size, Some(25));
        assert_eq!(overrides.http.timeout_secs, None);
        Ok(())
    }

    #[test]
    fn env_rejects_non_numeric_limits() {
        let result =
            ConfigOverrides::from_lookup(lookup_from(&[("SKUCHECK_DRIVE_PAGE_SIZE", "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "storage.page_size",
                ..
            })
        ));
    }

    #[test]
    fn load_without_sources_yields_defaults() -> ConfigResult<()> {
        let config = load(None, |_| None)?;
        assert_eq!(config, SkuCheckConfig::defaults()?);
        Ok(())
    }
}
