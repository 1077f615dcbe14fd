//! Backend traits implemented by the record store and storage adapters.

use async_trait::async_trait;

use crate::error::{EnumerationResult, RecordStoreResult};
use crate::model::{LinkedRecord, ProductRecord, RemoteFile};
use crate::sku::Sku;

/// Tabular backend holding product and linked raw-data records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the product whose SKU equals `sku`. When several records match,
    /// the first one returned by the backend wins.
    async fn fetch_by_sku(&self, sku: &Sku) -> RecordStoreResult<ProductRecord>;

    /// Best-effort fetch of a linked raw-data record. Any failure yields
    /// `None`; implementations must never surface an error here.
    async fn fetch_linked(&self, record_id: &str) -> Option<LinkedRecord>;
}

/// File-storage backend able to list the images of a folder.
#[async_trait]
pub trait FileEnumerator: Send + Sync {
    /// List image files in `folder_id`, name-ascending and capped at the
    /// adapter's page size.
    async fn list_images(&self, folder_id: &str) -> EnumerationResult<Vec<RemoteFile>>;
}
