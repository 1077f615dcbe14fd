//! User-facing notices for fatal failures and degraded results.

use serde::Serialize;
use skucheck_core::{Degradation, EnumerationError, ErrorKind, MissingTarget, RecordStoreError};

/// Blocking message shown instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FatalNotice {
    /// Failure kind.
    pub kind: ErrorKind,
    /// Short heading.
    pub title: String,
    /// Explanation for the user.
    pub message: String,
}

impl FatalNotice {
    /// Notice for a failed search.
    #[must_use]
    pub fn from_error(error: &RecordStoreError) -> Self {
        let (title, message) = match error {
            RecordStoreError::InvalidFormat { .. } => (
                "Invalid SKU",
                "Expected two or three letters, a dash, and four to six digits (e.g. MF-2411)."
                    .to_string(),
            ),
            RecordStoreError::CredentialMissing => (
                "Token missing",
                "Configure the Airtable token to start searching.".to_string(),
            ),
            RecordStoreError::Unauthorized => (
                "Invalid token",
                "The Airtable token was rejected. Check the stored credentials.".to_string(),
            ),
            RecordStoreError::NotFound {
                target: MissingTarget::Sku(sku),
            } => ("Not found", format!("SKU \"{sku}\" not found.")),
            RecordStoreError::NotFound {
                target: MissingTarget::Table,
            } => ("Not found", "Table or base not found.".to_string()),
            RecordStoreError::RateLimited => (
                "Rate limited",
                "Rate limit reached. Wait 30 seconds and retry.".to_string(),
            ),
            RecordStoreError::TransportError {
                status: Some(status),
                ..
            } => ("Error", format!("Airtable API error: {status}.")),
            RecordStoreError::TransportError { status: None, detail } => {
                ("Error", format!("Airtable unreachable: {detail}."))
            }
        };
        Self {
            kind: error.kind(),
            title: title.to_string(),
            message,
        }
    }
}

/// Transient note explaining why a result is degraded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Enumeration failure kind; `None` when no folder was resolved.
    pub kind: Option<ErrorKind>,
    /// Explanation for the user.
    pub message: String,
}

impl Advisory {
    /// Advisory for a degraded result.
    #[must_use]
    pub fn from_degradation(degradation: &Degradation) -> Self {
        let message = match degradation {
            Degradation::FolderUnresolved => {
                "No photo folder is linked to this product; photos cannot be verified.".to_string()
            }
            Degradation::Enumeration { error } => enumeration_message(error),
        };
        Self {
            kind: degradation.error_kind(),
            message,
        }
    }
}

fn enumeration_message(error: &EnumerationError) -> String {
    match error {
        EnumerationError::CredentialMissing => {
            "Google API key missing; folder listing skipped.".to_string()
        }
        EnumerationError::FolderIdMissing => {
            "Folder id missing; folder listing skipped.".to_string()
        }
        EnumerationError::AccessDenied { .. } => "Folder access denied.".to_string(),
        EnumerationError::QuotaOrApiDisabled { reason } => {
            format!("Drive API disabled or over quota for this key ({reason}).")
        }
        EnumerationError::FolderNotFound { folder_id } => {
            format!("Folder {folder_id} not found.")
        }
        EnumerationError::NetworkError { .. } => {
            "Network error while listing the folder.".to_string()
        }
        EnumerationError::ApiError { status: Some(status) } => {
            format!("Drive API error: {status}.")
        }
        EnumerationError::ApiError { status: None } => "Drive API error.".to_string(),
    }
}
