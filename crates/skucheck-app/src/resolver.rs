//! Folder resolution.
//!
//! # Design
//! - Strategies run in order and the first non-empty folder id wins.
//! - A strategy that cannot answer returns `None`; resolution never fails.

use async_trait::async_trait;
use skucheck_core::{FolderReference, ProductRecord, RecordStore};
use tracing::debug;

/// One way of deriving a folder id from a product record.
#[async_trait]
pub trait FolderStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Folder id for `record`, if this strategy can find one.
    async fn resolve(&self, record: &ProductRecord, store: &dyn RecordStore) -> Option<String>;
}

/// Reads the folder id stored on the product itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectFolderField;

#[async_trait]
impl FolderStrategy for DirectFolderField {
    fn name(&self) -> &'static str {
        "direct_field"
    }

    async fn resolve(&self, record: &ProductRecord, _store: &dyn RecordStore) -> Option<String> {
        record.direct_folder_id().map(str::to_string)
    }
}

/// Follows the first linked raw-data record and reads its folder id.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedRecordFolder;

#[async_trait]
impl FolderStrategy for LinkedRecordFolder {
    fn name(&self) -> &'static str {
        "linked_record"
    }

    async fn resolve(&self, record: &ProductRecord, store: &dyn RecordStore) -> Option<String> {
        let linked_id = record.linked_record_id()?;
        let linked = store.fetch_linked(linked_id).await?;
        linked.folder_id()
    }
}

/// Ordered list of folder strategies.
pub struct FolderResolver {
    strategies: Vec<Box<dyn FolderStrategy>>,
}

impl FolderResolver {
    /// Direct field first, then the linked record.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_strategies(vec![
            Box::new(DirectFolderField),
            Box::new(LinkedRecordFolder),
        ])
    }

    /// Resolver evaluating `strategies` in the given order.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn FolderStrategy>>) -> Self {
        Self { strategies }
    }

    /// First folder id produced by any strategy.
    pub async fn resolve(
        &self,
        record: &ProductRecord,
        store: &dyn RecordStore,
    ) -> FolderReference {
        for strategy in &self.strategies {
            if let Some(folder_id) = strategy
                .resolve(record, store)
                .await
                .filter(|folder_id| !folder_id.trim().is_empty())
            {
                debug!(
                    record_id = %record.id,
                    strategy = strategy.name(),
                    folder_id = %folder_id,
                    "folder resolved"
                );
                return Some(folder_id);
            }
        }
        debug!(record_id = %record.id, "no folder resolved");
        None
    }
}

impl Default for FolderResolver {
    fn default() -> Self {
        Self::standard()
    }
}
