//! Errors raised while building the record store client.
//!
//! Request failures are reported through [`skucheck_core::RecordStoreError`].

use thiserror::Error;

/// Client construction failures.
#[derive(Debug, Error)]
pub enum AirtableError {
    /// The underlying HTTP client could not be built.
    #[error("failed to build record store http client")]
    HttpClient {
        /// Source reqwest error.
        source: reqwest::Error,
    },
}

/// Convenience alias for client construction results.
pub type AirtableResult<T> = Result<T, AirtableError>;
