//! # Design
//!
//! - Record store failures are fatal to a search; enumeration failures are
//!   recovered into a degradation reason by the orchestrator.
//! - Messages stay constant; context travels in fields.
//! - Both enums fold into the closed [`ErrorKind`] set used for messaging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of failure kinds a search can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// SKU input did not match the expected pattern.
    InvalidFormat,
    /// A required credential was not configured.
    CredentialMissing,
    /// The record store rejected the credential.
    Unauthorized,
    /// The SKU (or the table holding it) does not exist.
    NotFound,
    /// The record store throttled the request.
    RateLimited,
    /// Any other record store failure.
    TransportError,
    /// Enumeration was requested without a folder id.
    FolderIdMissing,
    /// The storage service denied access to the folder.
    AccessDenied,
    /// The storage API is disabled for the key or its quota is exhausted.
    QuotaOrApiDisabled,
    /// The storage service does not know the folder id.
    FolderNotFound,
    /// No response was received from the storage service.
    NetworkError,
    /// Any other storage service failure.
    ApiError,
}

impl ErrorKind {
    /// Stable machine-readable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidFormat => "invalid_format",
            Self::CredentialMissing => "credential_missing",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::TransportError => "transport_error",
            Self::FolderIdMissing => "folder_id_missing",
            Self::AccessDenied => "access_denied",
            Self::QuotaOrApiDisabled => "quota_or_api_disabled",
            Self::FolderNotFound => "folder_not_found",
            Self::NetworkError => "network_error",
            Self::ApiError => "api_error",
        }
    }
}

/// What a record store `NotFound` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingTarget {
    /// The lookup succeeded but no record carries this SKU.
    Sku(String),
    /// The base or table itself could not be found.
    Table,
}

/// Failures raised while fetching the primary product record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordStoreError {
    /// SKU input did not match the expected pattern.
    #[error("invalid sku format")]
    InvalidFormat {
        /// Raw input as supplied by the caller.
        input: String,
    },
    /// No record store token is configured.
    #[error("record store credential missing")]
    CredentialMissing,
    /// The record store rejected the token.
    #[error("record store rejected credential")]
    Unauthorized,
    /// Nothing matched the lookup.
    #[error("record not found")]
    NotFound {
        /// Missing SKU or table.
        target: MissingTarget,
    },
    /// The record store throttled the request.
    #[error("record store rate limited")]
    RateLimited,
    /// Any other non-success status or network failure.
    #[error("record store request failed")]
    TransportError {
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Transport or decoding detail.
        detail: String,
    },
}

impl RecordStoreError {
    /// Closed failure kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::CredentialMissing => ErrorKind::CredentialMissing,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::TransportError { .. } => ErrorKind::TransportError,
        }
    }

    /// Build a transport failure from any displayable source.
    pub fn transport(status: Option<u16>, detail: impl ToString) -> Self {
        Self::TransportError {
            status,
            detail: detail.to_string(),
        }
    }
}

/// Convenience alias for record store results.
pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Failures raised while listing the files of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnumerationError {
    /// No storage API key is configured.
    #[error("storage credential missing")]
    CredentialMissing,
    /// Enumeration was requested with an empty folder id.
    #[error("folder id missing")]
    FolderIdMissing,
    /// The service answered with a permission-class error.
    #[error("folder access denied")]
    AccessDenied {
        /// Structured reason reported by the service, when present.
        reason: Option<String>,
    },
    /// The API surface is disabled for the key or over quota.
    #[error("storage api disabled or over quota")]
    QuotaOrApiDisabled {
        /// Structured reason reported by the service.
        reason: String,
    },
    /// The folder id is unknown to the service.
    #[error("folder not found")]
    FolderNotFound {
        /// Folder id that was queried.
        folder_id: String,
    },
    /// The request never produced a response.
    #[error("storage network failure")]
    NetworkError {
        /// Transport detail.
        detail: String,
    },
    /// Any other non-success response.
    #[error("storage api error")]
    ApiError {
        /// HTTP status when a response was received.
        status: Option<u16>,
    },
}

impl EnumerationError {
    /// Closed failure kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CredentialMissing => ErrorKind::CredentialMissing,
            Self::FolderIdMissing => ErrorKind::FolderIdMissing,
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::QuotaOrApiDisabled { .. } => ErrorKind::QuotaOrApiDisabled,
            Self::FolderNotFound { .. } => ErrorKind::FolderNotFound,
            Self::NetworkError { .. } => ErrorKind::NetworkError,
            Self::ApiError { .. } => ErrorKind::ApiError,
        }
    }
}

/// Convenience alias for enumeration results.
pub type EnumerationResult<T> = Result<T, EnumerationError>;
