//! Store doubles that fail on demand or count writes

use async_trait::async_trait;
use bshow_common::store::{MemoryBlobStore, MemoryDocumentStore};
use bshow_common::{BlobStore, Collection, DocumentStore, Error, FieldUpdate, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Blob store that rejects uploads whose path contains a marker
///
/// Other uploads are delayed a little so they are still in flight when the
/// rejection lands.
pub struct FailingBlobStore {
    inner: MemoryBlobStore,
    fail_marker: String,
    fail_deletes: bool,
}

impl FailingBlobStore {
    pub fn failing_uploads(marker: &str) -> Self {
        Self {
            inner: MemoryBlobStore::default(),
            fail_marker: marker.to_string(),
            fail_deletes: false,
        }
    }

    pub fn failing_deletes() -> Self {
        Self {
            inner: MemoryBlobStore::default(),
            fail_marker: String::new(),
            fail_deletes: true,
        }
    }

    pub async fn stored_paths(&self) -> Vec<String> {
        self.inner.paths().await
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        if !self.fail_marker.is_empty() && path.contains(&self.fail_marker) {
            return Err(Error::Blob(format!("upload rejected: {}", path)));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.put(path, bytes).await
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        self.inner.download_url(path).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        if self.fail_deletes {
            return Err(Error::Blob("permission denied".to_string()));
        }
        self.inner.delete(path).await
    }
}

/// Memory document store that counts writes and can refuse updates
#[derive(Default)]
pub struct RecordingDocumentStore {
    inner: MemoryDocumentStore,
    writes: AtomicUsize,
    refuse_updates: bool,
}

impl RecordingDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing_updates() -> Self {
        Self {
            refuse_updates: true,
            ..Self::default()
        }
    }

    /// Adds and updates issued so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }
}

#[async_trait]
impl DocumentStore for RecordingDocumentStore {
    async fn add(&self, collection: Collection, document: Value) -> Result<String> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.add(collection, document).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>> {
        self.inner.list(collection).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        updates: Vec<FieldUpdate>,
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.refuse_updates {
            return Err(Error::Store("update refused".to_string()));
        }
        self.inner.update(collection, id, updates).await
    }
}
