//! Blob store adapters and download-reference helpers
//!
//! Download references look like `<base>/o/<percent-encoded path>?alt=media`,
//! so the storage path can be recovered from a stored URL when an image is
//! deleted.

use super::BlobStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

/// Build the download reference for a blob path
pub fn download_url_for(base_url: &str, path: &str) -> String {
    format!(
        "{}/o/{}?alt=media",
        base_url.trim_end_matches('/'),
        urlencoding::encode(path)
    )
}

/// Recover the blob path from a download reference
///
/// The encoded segment after `/o/` (up to any query string) is decoded. A
/// reference without that segment is taken to be the path itself.
pub fn blob_path_from_url(url: &str) -> String {
    if let Some(start) = url.find("/o/") {
        let rest = &url[start + 3..];
        let encoded = rest.split('?').next().unwrap_or_default();
        if !encoded.is_empty() {
            return urlencoding::decode(encoded)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| encoded.to_string());
        }
    }
    url.to_string()
}

/// Blob store held in memory
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Stored bytes at `path`, if any
    pub async fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(path).cloned()
    }

    /// All stored paths, sorted
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BLOB_BASE_URL)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        self.blobs
            .write()
            .await
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        if self.blobs.read().await.contains_key(path) {
            Ok(download_url_for(&self.base_url, path))
        } else {
            Err(Error::NotFound(format!("blob {}", path)))
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        match self.blobs.write().await.remove(path) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("blob {}", path))),
        }
    }
}

/// Blob store writing files under a root folder
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Build from the `[storage]` configuration section
    pub fn from_config(storage: &crate::config::StorageConfig) -> Self {
        Self::new(storage.blob_root.clone(), storage.blob_base_url.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a blob path onto the filesystem, refusing escapes from the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !clean {
            return Err(Error::InvalidInput(format!("Invalid blob path: {}", path)));
        }
        Ok(self.root.join(relative))
    }
}

fn map_not_found(e: std::io::Error, path: &str) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(format!("blob {}", path))
    } else {
        Error::Io(e)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        debug!(path = %path, size = bytes.len(), "Blob written");
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String> {
        let target = self.resolve(path)?;
        tokio::fs::metadata(&target)
            .await
            .map_err(|e| map_not_found(e, path))?;
        Ok(download_url_for(&self.base_url, path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        tokio::fs::remove_file(&target)
            .await
            .map_err(|e| map_not_found(e, path))?;
        debug!(path = %path, "Blob removed");
        Ok(())
    }
}
