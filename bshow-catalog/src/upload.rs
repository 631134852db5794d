//! Image upload coordination
//!
//! New fabrics upload their main image and all three galleries concurrently
//! under `fabrics/<folder>/<segment>/<millis>_<file name>`. The batch either
//! yields every download reference or fails as a whole; blobs stored before
//! the failure are left in place.
//!
//! Progress is a shared counter of files that finished both the upload and
//! the download-reference lookup, in whatever order they finish.

use crate::error::{CatalogError, CatalogResult};
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::time::now_millis;
use bshow_common::{BlobStore, UploadSegment};
use futures::future::try_join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Root folder for fabric images
pub const FABRICS_ROOT: &str = "fabrics";

/// A picked image file
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    /// Original file name
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Everything uploaded for a new fabric
#[derive(Debug, Clone)]
pub struct FabricImages {
    pub main: ImageFile,
    pub men: Vec<ImageFile>,
    pub women: Vec<ImageFile>,
    pub kids: Vec<ImageFile>,
}

impl FabricImages {
    /// Main image plus every gallery file
    pub fn file_count(&self) -> usize {
        1 + self.men.len() + self.women.len() + self.kids.len()
    }
}

/// Download references of an uploaded [`FabricImages`], in pick order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadedImages {
    pub main_image: String,
    pub men: Vec<String>,
    pub women: Vec<String>,
    pub kids: Vec<String>,
}

/// Folder name for a new fabric: whitespace runs become `_`, anything other
/// than letters, digits, `_` and `-` is dropped, and the creation time is
/// appended
pub fn make_folder_base(name: &str, millis: i64) -> String {
    let mut folder = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                folder.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            folder.push(ch);
        }
    }

    format!("{}_{}", folder, millis)
}

/// Blob path for one image
pub fn blob_path(folder: &str, segment: UploadSegment, millis: i64, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}_{}",
        FABRICS_ROOT,
        folder,
        segment.as_str(),
        millis,
        file_name
    )
}

/// Completed-file counter for one batch
///
/// Cloning shares the counter.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    completed: Arc<AtomicUsize>,
    total: usize,
}

impl UploadProgress {
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total,
        }
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }

    /// Whole percent done, 0 for an empty batch
    pub fn percent(&self) -> u8 {
        percent_of(self.completed(), self.total)
    }

    /// Count one finished file, returning the new total
    fn record(&self) -> usize {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// `round(done / total * 100)`, or 0 when `total` is 0
pub fn percent_of(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (done as f64 / total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Uploads image files to the blob store and resolves their references
#[derive(Clone)]
pub struct UploadCoordinator {
    blobs: Arc<dyn BlobStore>,
    event_bus: EventBus,
}

impl UploadCoordinator {
    pub fn new(blobs: Arc<dyn BlobStore>, event_bus: EventBus) -> Self {
        Self { blobs, event_bus }
    }

    /// Upload one file and resolve its download reference
    ///
    /// Progress is counted only after both steps succeed.
    pub async fn upload_one(
        &self,
        path: String,
        file: &ImageFile,
        segment: UploadSegment,
        progress: &UploadProgress,
    ) -> bshow_common::Result<String> {
        self.blobs.put(&path, &file.bytes).await?;
        let url = self.blobs.download_url(&path).await?;

        let completed = progress.record();
        debug!(path = %path, completed, total = progress.total(), "Image uploaded");
        self.event_bus.emit_lossy(ShowroomEvent::UploadProgress {
            completed,
            total: progress.total(),
            segment,
        });

        Ok(url)
    }

    /// Upload a segment's files concurrently; references keep file order
    async fn upload_segment(
        &self,
        folder: &str,
        segment: UploadSegment,
        files: &[ImageFile],
        progress: &UploadProgress,
    ) -> bshow_common::Result<Vec<String>> {
        try_join_all(files.iter().map(|file| {
            let path = blob_path(folder, segment, now_millis(), &file.name);
            self.upload_one(path, file, segment, progress)
        }))
        .await
    }

    /// Upload a new fabric's images, all segments at once
    ///
    /// The first failure ends the batch; uploads still in flight are
    /// dropped.
    pub async fn upload_fabric_images(
        &self,
        folder: &str,
        images: &FabricImages,
        progress: &UploadProgress,
    ) -> CatalogResult<UploadedImages> {
        info!(folder = %folder, files = images.file_count(), "Uploading fabric images");

        let main_path = blob_path(folder, UploadSegment::Main, now_millis(), &images.main.name);
        let main = self.upload_one(main_path, &images.main, UploadSegment::Main, progress);
        let men = self.upload_segment(folder, UploadSegment::Men, &images.men, progress);
        let women = self.upload_segment(folder, UploadSegment::Women, &images.women, progress);
        let kids = self.upload_segment(folder, UploadSegment::Kids, &images.kids, progress);

        let (main_image, men, women, kids) = futures::try_join!(main, men, women, kids)
            .map_err(|e| {
                warn!(
                    folder = %folder,
                    completed = progress.completed(),
                    total = progress.total(),
                    error = %e,
                    "Fabric image upload failed"
                );
                CatalogError::Upload(e)
            })?;

        Ok(UploadedImages {
            main_image,
            men,
            women,
            kids,
        })
    }

    /// Upload files one after another under `fabrics/<base>/<segment>/`
    pub async fn upload_sequential(
        &self,
        base: &str,
        segment: UploadSegment,
        files: &[ImageFile],
        progress: &UploadProgress,
    ) -> CatalogResult<Vec<String>> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let path = blob_path(base, segment, now_millis(), &file.name);
            let url = self
                .upload_one(path, file, segment, progress)
                .await
                .map_err(CatalogError::Upload)?;
            urls.push(url);
        }
        Ok(urls)
    }
}
