//! Scripted fakes for the service traits.
//!
//! Both fakes count calls and can hold a call at a [`Gate`] until the test
//! releases it, which is how interleavings between searches are staged.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use skucheck_core::{
    EnumerationError, EnumerationResult, FileEnumerator, LinkedRecord, MissingTarget,
    ProductRecord, RecordStore, RecordStoreError, RecordStoreResult, RemoteFile, Sku,
};
use tokio::sync::{Notify, Semaphore};

/// Barrier a scripted call waits on until the test opens it.
#[derive(Debug)]
pub struct Gate {
    release: Semaphore,
    arrived: Notify,
}

impl Gate {
    /// Closed gate.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            release: Semaphore::new(0),
            arrived: Notify::new(),
        })
    }

    /// Let every current and future caller through.
    pub fn open(&self) {
        // A closed semaphore fails every acquire immediately.
        self.release.close();
    }

    /// Resolve once a caller is blocked at the gate.
    pub async fn arrived(&self) {
        self.arrived.notified().await;
    }

    async fn pass(&self) {
        self.arrived.notify_one();
        let _ = self.release.acquire().await;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Record store answering from in-memory scripts.
#[derive(Debug, Default)]
pub struct ScriptedRecordStore {
    products: Mutex<HashMap<String, RecordStoreResult<ProductRecord>>>,
    linked: Mutex<HashMap<String, LinkedRecord>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    product_calls: AtomicUsize,
    linked_calls: AtomicUsize,
}

impl ScriptedRecordStore {
    /// Store with no records; every lookup reports the SKU as missing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer lookups for `sku` with `record`.
    #[must_use]
    pub fn with_product(self, sku: &str, record: ProductRecord) -> Self {
        lock(&self.products).insert(sku.to_string(), Ok(record));
        self
    }

    /// Answer lookups for `sku` with `error`.
    #[must_use]
    pub fn with_failure(self, sku: &str, error: RecordStoreError) -> Self {
        lock(&self.products).insert(sku.to_string(), Err(error));
        self
    }

    /// Make `record` available to linked lookups.
    #[must_use]
    pub fn with_linked(self, record: LinkedRecord) -> Self {
        lock(&self.linked).insert(record.id.clone(), record);
        self
    }

    /// Hold lookups for `sku` until the returned gate opens.
    #[must_use]
    pub fn gate(&self, sku: &str) -> Arc<Gate> {
        let gate = Gate::new();
        lock(&self.gates).insert(sku.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of product lookups served.
    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Number of linked lookups served.
    #[must_use]
    pub fn linked_calls(&self) -> usize {
        self.linked_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for ScriptedRecordStore {
    async fn fetch_by_sku(&self, sku: &Sku) -> RecordStoreResult<ProductRecord> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        let gate = lock(&self.gates).get(sku.as_str()).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        lock(&self.products)
            .get(sku.as_str())
            .cloned()
            .unwrap_or_else(|| {
                Err(RecordStoreError::NotFound {
                    target: MissingTarget::Sku(sku.to_string()),
                })
            })
    }

    async fn fetch_linked(&self, record_id: &str) -> Option<LinkedRecord> {
        self.linked_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.linked).get(record_id).cloned()
    }
}

/// File enumerator answering from in-memory scripts.
#[derive(Debug, Default)]
pub struct ScriptedEnumerator {
    folders: Mutex<HashMap<String, EnumerationResult<Vec<RemoteFile>>>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
    requested: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedEnumerator {
    /// Enumerator with no folders; every listing reports the folder missing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer listings of `folder_id` with `files`.
    #[must_use]
    pub fn with_files(self, folder_id: &str, files: Vec<RemoteFile>) -> Self {
        lock(&self.folders).insert(folder_id.to_string(), Ok(files));
        self
    }

    /// Answer listings of `folder_id` with `error`.
    #[must_use]
    pub fn with_failure(self, folder_id: &str, error: EnumerationError) -> Self {
        lock(&self.folders).insert(folder_id.to_string(), Err(error));
        self
    }

    /// Hold listings of `folder_id` until the returned gate opens.
    #[must_use]
    pub fn gate(&self, folder_id: &str) -> Arc<Gate> {
        let gate = Gate::new();
        lock(&self.gates).insert(folder_id.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of listings served.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Folder ids in the order they were requested.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        lock(&self.requested).clone()
    }
}

#[async_trait]
impl FileEnumerator for ScriptedEnumerator {
    async fn list_images(&self, folder_id: &str) -> EnumerationResult<Vec<RemoteFile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.requested).push(folder_id.to_string());
        let gate = lock(&self.gates).get(folder_id).cloned();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        lock(&self.folders)
            .get(folder_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(EnumerationError::FolderNotFound {
                    folder_id: folder_id.to_string(),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{image, product_fields, product_record};
    use skucheck_core::normalize;

    #[tokio::test]
    async fn record_store_replays_scripts_and_counts() -> anyhow::Result<()> {
        let record = product_record("recA", product_fields("MF-2411", "F1", "a", "b"))?;
        let store = ScriptedRecordStore::new().with_product("MF-2411", record.clone());

        assert_eq!(store.fetch_by_sku(&normalize("mf-2411")?).await, Ok(record));
        assert!(matches!(
            store.fetch_by_sku(&normalize("ZZ-0000")?).await,
            Err(RecordStoreError::NotFound { .. })
        ));
        assert_eq!(store.fetch_linked("recMissing").await, None);
        assert_eq!(store.product_calls(), 2);
        assert_eq!(store.linked_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn gate_holds_enumeration_until_opened() {
        let enumerator =
            Arc::new(ScriptedEnumerator::new().with_files("F1", vec![image("a", "a.jpg")]));
        let gate = enumerator.gate("F1");

        let task = {
            let enumerator = Arc::clone(&enumerator);
            tokio::spawn(async move { enumerator.list_images("F1").await })
        };
        gate.arrived().await;
        assert!(!task.is_finished());
        gate.open();

        let listed = task.await.ok().and_then(Result::ok).unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(enumerator.requested(), vec!["F1".to_string()]);
    }
}
