//! Search result assembly.
//!
//! # Design
//! - `SearchResult` is the only artifact handed to presentation and is
//!   immutable once built; fields are exposed through accessors.
//! - Verdicts are derived from the enumeration outcome at construction time so
//!   they can never disagree with the attached listing.

use serde::Serialize;

use crate::error::{EnumerationError, ErrorKind};
use crate::links::extract_file_id;
use crate::model::{FolderReference, ProductRecord, RemoteFile};
use crate::sku::Sku;
use crate::verify::{Verdict, verify_pair};

/// Why a result carries no folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Degradation {
    /// Neither the direct field nor the linked record yielded a folder id.
    FolderUnresolved,
    /// A folder id was resolved but listing it failed.
    Enumeration {
        /// Failure reported by the file enumerator.
        error: EnumerationError,
    },
}

impl Degradation {
    /// Enumerator failure kind, when the degradation came from enumeration.
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::FolderUnresolved => None,
            Self::Enumeration { error } => Some(error.kind()),
        }
    }
}

/// Outcome of the enumeration step as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enumeration {
    /// Enumeration did not run because no folder was resolved.
    Skipped,
    /// Enumeration succeeded.
    Listed(Vec<RemoteFile>),
    /// Enumeration failed.
    Failed(EnumerationError),
}

/// Everything presentation needs to render one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    sku: Sku,
    record: ProductRecord,
    folder: FolderReference,
    files: Option<Vec<RemoteFile>>,
    front: Verdict,
    back: Verdict,
    degradation: Option<Degradation>,
}

impl SearchResult {
    /// Combine a fetched record, its resolved folder, and the enumeration
    /// outcome into a result with front/back verdicts.
    #[must_use]
    pub fn assemble(
        sku: Sku,
        record: ProductRecord,
        folder: FolderReference,
        enumeration: Enumeration,
    ) -> Self {
        let (files, degradation) = match enumeration {
            Enumeration::Skipped => (None, Some(Degradation::FolderUnresolved)),
            Enumeration::Listed(files) => (Some(files), None),
            Enumeration::Failed(error) => (None, Some(Degradation::Enumeration { error })),
        };
        // Share links pasted into the id columns compare by their file id.
        let front_id = record.front_file_id().and_then(extract_file_id);
        let back_id = record.back_file_id().and_then(extract_file_id);
        let (front, back) = verify_pair(front_id.as_deref(), back_id.as_deref(), files.as_deref());
        Self {
            sku,
            record,
            folder,
            files,
            front,
            back,
            degradation,
        }
    }

    /// Normalised SKU that was searched.
    #[must_use]
    pub const fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Fetched product record.
    #[must_use]
    pub const fn record(&self) -> &ProductRecord {
        &self.record
    }

    /// Resolved folder id.
    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Folder listing, when enumeration succeeded.
    #[must_use]
    pub fn files(&self) -> Option<&[RemoteFile]> {
        self.files.as_deref()
    }

    /// Verdict for the front photo.
    #[must_use]
    pub const fn front(&self) -> Verdict {
        self.front
    }

    /// Verdict for the back photo.
    #[must_use]
    pub const fn back(&self) -> Verdict {
        self.back
    }

    /// Reason the listing is missing, if any.
    #[must_use]
    pub const fn degradation(&self) -> Option<&Degradation> {
        self.degradation.as_ref()
    }
}
