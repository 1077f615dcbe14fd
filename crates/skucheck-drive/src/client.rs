//! HTTP adapter for folder image listings.
//!
//! # Design
//! - The server is asked for images ordered by name, but the result is still
//!   filtered, sorted, and capped locally so the ordering holds for any backend.
//! - Every failure maps to exactly one [`EnumerationError`] variant.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use skucheck_config::{DRIVE_API_KEY_SECRET, SecretProvider, StorageConfig, read_credential};
use skucheck_core::{EnumerationError, EnumerationResult, FileEnumerator, RemoteFile};
use tracing::{debug, warn};
use url::Url;

use crate::error::{DriveError, DriveResult};
use crate::wire::{FileList, permission_failure};

const LIST_FIELDS: &str = "files(id,name,mimeType,thumbnailLink,size)";
const IMAGE_MIME_PREFIX: &str = "image/";

/// File enumerator backed by the Drive v3 files endpoint.
#[derive(Clone)]
pub struct DriveClient {
    http: Client,
    config: StorageConfig,
    secrets: Arc<dyn SecretProvider>,
}

impl DriveClient {
    /// Build a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::HttpClient`] when the TLS backend cannot be
    /// initialised.
    pub fn new(
        config: StorageConfig,
        timeout: Duration,
        secrets: Arc<dyn SecretProvider>,
    ) -> DriveResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| DriveError::HttpClient { source })?;
        Ok(Self::with_client(http, config, secrets))
    }

    /// Build a client around an existing HTTP client.
    #[must_use]
    pub fn with_client(
        http: Client,
        config: StorageConfig,
        secrets: Arc<dyn SecretProvider>,
    ) -> Self {
        Self {
            http,
            config,
            secrets,
        }
    }

    fn list_url(&self, folder_id: &str, api_key: &str) -> EnumerationResult<Url> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| EnumerationError::ApiError { status: None })?
            .pop_if_empty()
            .extend(["drive", "v3", "files"]);
        url.query_pairs_mut()
            .append_pair("q", &folder_query(folder_id))
            .append_pair("fields", LIST_FIELDS)
            .append_pair("orderBy", "name")
            .append_pair("pageSize", &self.config.page_size.to_string())
            .append_pair("key", api_key);
        Ok(url)
    }

    fn page_limit(&self) -> usize {
        usize::try_from(self.config.page_size).unwrap_or(usize::MAX)
    }
}

#[async_trait]
impl FileEnumerator for DriveClient {
    async fn list_images(&self, folder_id: &str) -> EnumerationResult<Vec<RemoteFile>> {
        let api_key = read_credential(self.secrets.as_ref(), DRIVE_API_KEY_SECRET)
            .ok_or(EnumerationError::CredentialMissing)?;
        let folder_id = folder_id.trim();
        if folder_id.is_empty() {
            return Err(EnumerationError::FolderIdMissing);
        }
        let url = self.list_url(folder_id, &api_key)?;
        debug!(folder_id, "listing folder images");

        let response = self.http.get(url).send().await.map_err(|err| {
            warn!(folder_id, error = %err, "folder listing request failed");
            EnumerationError::NetworkError {
                detail: err.to_string(),
            }
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| EnumerationError::NetworkError {
                detail: err.to_string(),
            })?;

        if !status.is_success() {
            let error = map_failure(status, &body, folder_id);
            warn!(
                folder_id,
                status = status.as_u16(),
                kind = error.kind().as_str(),
                "folder listing rejected"
            );
            return Err(error);
        }

        let list: FileList = serde_json::from_str(&body).map_err(|err| {
            warn!(folder_id, error = %err, "folder listing body did not decode");
            EnumerationError::ApiError {
                status: Some(status.as_u16()),
            }
        })?;
        let files = select_images(
            list.files.into_iter().map(RemoteFile::from),
            self.page_limit(),
        );
        debug!(folder_id, count = files.len(), "folder listing complete");
        Ok(files)
    }
}

fn folder_query(folder_id: &str) -> String {
    let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}' in parents and mimeType contains 'image' and trashed = false")
}

fn map_failure(status: StatusCode, body: &str, folder_id: &str) -> EnumerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => permission_failure(body),
        StatusCode::NOT_FOUND => EnumerationError::FolderNotFound {
            folder_id: folder_id.to_string(),
        },
        other => EnumerationError::ApiError {
            status: Some(other.as_u16()),
        },
    }
}

fn select_images(files: impl Iterator<Item = RemoteFile>, limit: usize) -> Vec<RemoteFile> {
    let mut images: Vec<RemoteFile> = files
        .filter(|file| file.mime_type.starts_with(IMAGE_MIME_PREFIX))
        .collect();
    images.sort_by(|left, right| left.name.cmp(&right.name));
    images.truncate(limit);
    images
}
