//! HTTP adapter for the product and linked raw-data tables.
//!
//! # Design
//! - The token is read from the secret provider on every call so credential
//!   changes apply without rebuilding the client.
//! - Product lookups are fatal on failure; linked lookups never fail and only
//!   log.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use skucheck_config::{AIRTABLE_TOKEN_SECRET, RecordStoreConfig, SecretProvider, read_credential};
use skucheck_core::{
    LinkedRecord, MissingTarget, ProductRecord, RecordStore, RecordStoreError, RecordStoreResult,
    Sku,
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{AirtableError, AirtableResult};
use crate::wire::{LINKED_FIELDS, ListResponse, PRODUCT_FIELDS};

/// Record store client backed by the Airtable REST API.
#[derive(Clone)]
pub struct AirtableClient {
    http: Client,
    config: RecordStoreConfig,
    secrets: Arc<dyn SecretProvider>,
}

impl AirtableClient {
    /// Build a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`AirtableError::HttpClient`] when the TLS backend cannot be
    /// initialised.
    pub fn new(
        config: RecordStoreConfig,
        timeout: Duration,
        secrets: Arc<dyn SecretProvider>,
    ) -> AirtableResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| AirtableError::HttpClient { source })?;
        Ok(Self::with_client(http, config, secrets))
    }

    /// Build a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(
        http: Client,
        config: RecordStoreConfig,
        secrets: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            http,
            config,
            secrets,
        }
    }

    /// Location this client talks to.
    #[must_use]
    pub const fn config(&self) -> &RecordStoreConfig {
        &self.config
    }

    fn token(&self) -> RecordStoreResult<String> {
        read_credential(self.secrets.as_ref(), AIRTABLE_TOKEN_SECRET)
            .ok_or(RecordStoreError::CredentialMissing)
    }

    fn table_url(&self, table: &str, record_id: Option<&str>) -> RecordStoreResult<Url> {
        let mut url = self.config.api_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                RecordStoreError::transport(None, "record store url cannot carry a path")
            })?;
            segments
                .pop_if_empty()
                .push(&self.config.base_id)
                .push(table);
            if let Some(record_id) = record_id {
                segments.push(record_id);
            }
        }
        Ok(url)
    }

    fn product_url(&self, sku: &Sku) -> RecordStoreResult<Url> {
        let mut url = self.table_url(&self.config.product_table, None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("filterByFormula", &sku_formula(sku));
            for field in PRODUCT_FIELDS {
                query.append_pair("fields[]", field);
            }
        }
        Ok(url)
    }

    fn linked_url(&self, record_id: &str) -> RecordStoreResult<Url> {
        let mut url = self.table_url(&self.config.linked_table, Some(record_id))?;
        {
            let mut query = url.query_pairs_mut();
            for field in LINKED_FIELDS {
                query.append_pair("fields[]", field);
            }
        }
        Ok(url)
    }

    async fn get_linked(&self, record_id: &str) -> RecordStoreResult<LinkedRecord> {
        let token = self.token()?;
        let url = self.linked_url(record_id)?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| RecordStoreError::transport(None, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status));
        }
        response
            .json::<LinkedRecord>()
            .await
            .map_err(|err| RecordStoreError::transport(Some(status.as_u16()), err))
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn fetch_by_sku(&self, sku: &Sku) -> RecordStoreResult<ProductRecord> {
        let token = self.token()?;
        let url = self.product_url(sku)?;
        debug!(sku = %sku, "fetching product record");

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| RecordStoreError::transport(None, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(map_status(status));
        }
        let body = response
            .json::<ListResponse>()
            .await
            .map_err(|err| RecordStoreError::transport(Some(status.as_u16()), err))?;

        if body.records.len() > 1 {
            warn!(
                sku = %sku,
                count = body.records.len(),
                "multiple records share this sku; using the first"
            );
        }
        body.records
            .into_iter()
            .next()
            .ok_or_else(|| RecordStoreError::NotFound {
                target: MissingTarget::Sku(sku.to_string()),
            })
    }

    async fn fetch_linked(&self, record_id: &str) -> Option<LinkedRecord> {
        if record_id.trim().is_empty() {
            return None;
        }
        match self.get_linked(record_id).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    record_id,
                    kind = err.kind().as_str(),
                    error = %err,
                    "linked record lookup failed"
                );
                None
            }
        }
    }
}

fn sku_formula(sku: &Sku) -> String {
    format!("{{SKU}}='{}'", sku.as_str().replace('\'', "\\'"))
}

fn map_status(status: StatusCode) -> RecordStoreError {
    match status {
        StatusCode::UNAUTHORIZED => RecordStoreError::Unauthorized,
        StatusCode::NOT_FOUND => RecordStoreError::NotFound {
            target: MissingTarget::Table,
        },
        StatusCode::TOO_MANY_REQUESTS => RecordStoreError::RateLimited,
        other => RecordStoreError::transport(
            Some(other.as_u16()),
            format!("unexpected status {other}"),
        ),
    }
}
