//! Errors raised while building the storage client.
//!
//! Listing failures are reported through [`skucheck_core::EnumerationError`].

use thiserror::Error;

/// Client construction failures.
#[derive(Debug, Error)]
pub enum DriveError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build storage http client")]
    HttpClient {
        /// Source reqwest error.
        source: reqwest::Error,
    },
}

/// Convenience alias for client construction results.
pub type DriveResult<T> = Result<T, DriveError>;
