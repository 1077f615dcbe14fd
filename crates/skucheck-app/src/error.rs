//! # Design
//!
//! - Wiring failures only; search failures travel as [`crate::SearchFailure`].
//! - Keep error messages constant while carrying context fields for debugging.

use thiserror::Error;

/// Result alias for application wiring.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: skucheck_config::ConfigError,
    },
    /// The record store client could not be built.
    #[error("record store client setup failed")]
    RecordStore {
        /// Source client error.
        source: skucheck_airtable::AirtableError,
    },
    /// The storage client could not be built.
    #[error("storage client setup failed")]
    Storage {
        /// Source client error.
        source: skucheck_drive::DriveError,
    },
}
