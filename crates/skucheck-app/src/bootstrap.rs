//! Wiring the HTTP adapters into a pipeline.

use std::path::Path;
use std::sync::Arc;

use skucheck_airtable::AirtableClient;
use skucheck_config::{SecretProvider, SkuCheckConfig};
use skucheck_drive::DriveClient;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::pipeline::SearchPipeline;

/// Load configuration from an optional JSON file and the process environment.
///
/// # Errors
///
/// Returns [`AppError::Config`] when the file or any override is invalid.
pub fn load_config(path: Option<&Path>) -> AppResult<SkuCheckConfig> {
    skucheck_config::load(path, |name| std::env::var(name).ok()).map_err(|source| {
        AppError::Config {
            operation: "config.load",
            source,
        }
    })
}

/// Build a pipeline talking to the configured record store and storage.
///
/// # Errors
///
/// Returns an error when either HTTP client cannot be constructed.
pub fn build_pipeline(
    config: &SkuCheckConfig,
    secrets: Arc<dyn SecretProvider>,
) -> AppResult<SearchPipeline> {
    let timeout = config.http.timeout();
    let store = AirtableClient::new(config.record_store.clone(), timeout, Arc::clone(&secrets))
        .map_err(|source| AppError::RecordStore { source })?;
    let enumerator = DriveClient::new(config.storage.clone(), timeout, secrets)
        .map_err(|source| AppError::Storage { source })?;
    debug!(
        record_store = %config.record_store.api_url,
        base_id = %config.record_store.base_id,
        storage = %config.storage.api_url,
        "search pipeline wired"
    );
    Ok(SearchPipeline::new(Arc::new(store), Arc::new(enumerator)))
}
