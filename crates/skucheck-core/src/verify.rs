//! Per-file verification verdicts.

use serde::{Deserialize, Serialize};

use crate::model::RemoteFile;

/// Outcome of checking one expected file against a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No file id was recorded on the product.
    Missing,
    /// The file id appears in the listing.
    Verified,
    /// The listing succeeded but does not contain the file id.
    NotFound,
    /// A file id exists but no listing was available to check it.
    Unverifiable,
}

impl Verdict {
    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Verified => "verified",
            Self::NotFound => "not_found",
            Self::Unverifiable => "unverifiable",
        }
    }
}

/// Classify `expected` against an optional listing.
///
/// Matching is exact and case-sensitive on the backend-assigned id.
#[must_use]
pub fn classify(expected: Option<&str>, files: Option<&[RemoteFile]>) -> Verdict {
    let Some(expected) = expected.filter(|id| !id.is_empty()) else {
        return Verdict::Missing;
    };
    let Some(files) = files else {
        return Verdict::Unverifiable;
    };
    if files.iter().any(|file| file.id == expected) {
        Verdict::Verified
    } else {
        Verdict::NotFound
    }
}

/// Classify the front and back file ids independently.
#[must_use]
pub fn verify_pair(
    front: Option<&str>,
    back: Option<&str>,
    files: Option<&[RemoteFile]>,
) -> (Verdict, Verdict) {
    (classify(front, files), classify(back, files))
}
