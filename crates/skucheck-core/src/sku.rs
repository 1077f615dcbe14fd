//! SKU normalisation.
//!
//! Every search starts here, before any network call is made.

use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{RecordStoreError, RecordStoreResult};

/// Two or three uppercase letters, a hyphen, four to six ASCII digits.
const SKU_PATTERN: &str = r"^[A-Z]{2,3}-[0-9]{4,6}$";

static SKU_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(SKU_PATTERN).ok());

/// Canonical, validated SKU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Borrow the canonical form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Sku {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim and upper-case `input`, then validate it against the SKU pattern.
///
/// # Errors
///
/// Returns [`RecordStoreError::InvalidFormat`] when the normalised input does
/// not match.
pub fn normalize(input: &str) -> RecordStoreResult<Sku> {
    let candidate = input.trim().to_uppercase();
    let valid = SKU_REGEX
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&candidate));
    if valid {
        Ok(Sku(candidate))
    } else {
        Err(RecordStoreError::InvalidFormat {
            input: input.to_string(),
        })
    }
}
