//! Validation helpers for configuration values and credentials.

use url::Url;

use crate::defaults::MAX_PAGE_SIZE;
use crate::error::{ConfigError, ConfigResult};
use crate::secrets::AIRTABLE_TOKEN_SECRET;

/// Prefix carried by record store personal access tokens.
const AIRTABLE_TOKEN_PREFIX: &str = "pat";

pub(crate) fn parse_url(field: &'static str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim()).map_err(|_| ConfigError::InvalidField {
        field,
        value: Some(value.to_string()),
        reason: "must be an absolute URL",
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(value.to_string()),
            reason: "must be a hierarchical URL",
        });
    }
    Ok(url)
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            value: Some(value.to_string()),
            reason: "must not be empty",
        });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_page_size(value: u32) -> ConfigResult<u32> {
    if (1..=MAX_PAGE_SIZE).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidField {
            field: "storage.page_size",
            value: Some(value.to_string()),
            reason: "must be between 1 and 1000",
        })
    }
}

pub(crate) fn validate_timeout(value: u64) -> ConfigResult<u64> {
    if value == 0 {
        return Err(ConfigError::InvalidField {
            field: "http.timeout_secs",
            value: Some(value.to_string()),
            reason: "must be positive",
        });
    }
    Ok(value)
}

/// Validate a record store token before it is stored.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidCredential`] when the token is blank or does
/// not carry the personal access token prefix.
pub fn validate_airtable_token(raw: &str) -> ConfigResult<String> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ConfigError::InvalidCredential {
            name: AIRTABLE_TOKEN_SECRET,
            reason: "token is required",
        });
    }
    if !token.starts_with(AIRTABLE_TOKEN_PREFIX) {
        return Err(ConfigError::InvalidCredential {
            name: AIRTABLE_TOKEN_SECRET,
            reason: "token must start with \"pat\"",
        });
    }
    Ok(token.to_string())
}

/// Trim an optional secret, mapping blank input to `None`.
#[must_use]
pub fn normalize_optional_secret(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
