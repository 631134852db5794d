//! Fabric catalog operations
//!
//! Fabrics live in the `Fabrics` collection; their images live in the blob
//! store and are referenced from the document by download URL.

use crate::error::{CatalogError, CatalogResult};
use crate::upload::{
    make_folder_base, FabricImages, ImageFile, UploadCoordinator, UploadProgress,
};
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::store::{add_record, blob_path_from_url, get_record, list_records};
use bshow_common::time::{now, now_millis};
use bshow_common::{
    BlobStore, Collection, DocumentStore, FabricRecord, FieldUpdate, GallerySegment, Stored,
    UploadSegment,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const MISSING_FABRIC_ID: &str = "No fabric ID provided";
pub const NO_SUCH_FABRIC: &str = "No such fabric!";
pub const ADD_FABRIC_REQUIRED: &str = "Please enter a fabric name and select a main image.";

/// Form input for a new fabric
#[derive(Debug, Clone, Default)]
pub struct FabricDraft {
    pub name: String,
    pub main_image: Option<ImageFile>,
    pub men: Vec<ImageFile>,
    pub women: Vec<ImageFile>,
    pub kids: Vec<ImageFile>,
}

impl FabricDraft {
    /// Split into name and images, rejecting a draft without a name or main
    /// image
    pub fn validate(self) -> CatalogResult<(String, FabricImages)> {
        match self.main_image {
            Some(main) if !self.name.trim().is_empty() => Ok((
                self.name,
                FabricImages {
                    main,
                    men: self.men,
                    women: self.women,
                    kids: self.kids,
                },
            )),
            _ => Err(CatalogError::Validation(ADD_FABRIC_REQUIRED.to_string())),
        }
    }

    /// Files a submit would upload
    pub fn file_count(&self) -> usize {
        usize::from(self.main_image.is_some()) + self.men.len() + self.women.len() + self.kids.len()
    }
}

/// Result of removing a gallery image
///
/// Blob removal is best effort: the URL leaves the document even when the
/// stored file could not be deleted, so `blob_removed` may be false while
/// `document_removed` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub document_removed: bool,
    pub blob_removed: bool,
}

/// Changes written by [`FabricCatalog::save_fabric_edits`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FabricEdits {
    pub name: Option<String>,
    pub main_image: Option<String>,
}

impl FabricEdits {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.main_image.is_none()
    }

    /// Apply to a locally held record
    pub fn apply_to(&self, record: &mut FabricRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(url) = &self.main_image {
            record.main_image = url.clone();
        }
    }

    fn into_updates(self) -> Vec<FieldUpdate> {
        let mut updates = Vec::new();
        if let Some(name) = self.name {
            updates.push(FieldUpdate::set("name", name));
        }
        if let Some(url) = self.main_image {
            updates.push(FieldUpdate::set("mainImage", url));
        }
        updates
    }
}

/// Status line for a successful fabric creation
pub fn fabric_added_status(id: &str) -> String {
    format!("Fabric added successfully! ID: {}", id)
}

/// Status line for the catalog listing
pub fn connection_status<T>(result: &CatalogResult<T>) -> &'static str {
    match result {
        Ok(_) => "Connected to main server",
        Err(_) => "Failed to connect to main server",
    }
}

/// Fabric catalog service
#[derive(Clone)]
pub struct FabricCatalog {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    uploads: UploadCoordinator,
    event_bus: EventBus,
}

impl FabricCatalog {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        event_bus: EventBus,
    ) -> Self {
        let uploads = UploadCoordinator::new(Arc::clone(&blobs), event_bus.clone());
        Self {
            documents,
            blobs,
            uploads,
            event_bus,
        }
    }

    /// All fabrics in listing order
    pub async fn list_fabrics(&self) -> CatalogResult<Vec<Stored<FabricRecord>>> {
        let fabrics = list_records(self.documents.as_ref(), Collection::Fabrics).await?;
        debug!(count = fabrics.len(), "Listed fabrics");
        Ok(fabrics)
    }

    pub async fn get_fabric(&self, fabric_id: &str) -> CatalogResult<Stored<FabricRecord>> {
        if fabric_id.is_empty() {
            return Err(CatalogError::NotFound(MISSING_FABRIC_ID.to_string()));
        }
        get_record::<_, FabricRecord>(self.documents.as_ref(), Collection::Fabrics, fabric_id)
            .await?
            .map(|record| Stored::new(fabric_id, record))
            .ok_or_else(|| CatalogError::NotFound(NO_SUCH_FABRIC.to_string()))
    }

    /// Create a fabric from a draft, returning the new id
    pub async fn add_fabric(&self, draft: FabricDraft) -> CatalogResult<String> {
        let progress = UploadProgress::new(draft.file_count());
        self.add_fabric_with_progress(draft, &progress).await
    }

    /// [`add_fabric`](Self::add_fabric) with a caller-held progress counter
    ///
    /// The fabric document is written only after every image uploaded.
    pub async fn add_fabric_with_progress(
        &self,
        draft: FabricDraft,
        progress: &UploadProgress,
    ) -> CatalogResult<String> {
        let (name, images) = draft.validate()?;
        let folder = make_folder_base(&name, now_millis());

        let uploaded = self
            .uploads
            .upload_fabric_images(&folder, &images, progress)
            .await?;

        let record = FabricRecord {
            name: name.clone(),
            main_image: uploaded.main_image,
            men_collection: uploaded.men,
            women_collection: uploaded.women,
            kids_collection: uploaded.kids,
            machines: Vec::new(),
        };
        let id = add_record(self.documents.as_ref(), Collection::Fabrics, &record).await?;

        info!(fabric_id = %id, name = %name, folder = %folder, "Fabric added");
        self.event_bus.emit_lossy(ShowroomEvent::FabricAdded {
            fabric_id: id.clone(),
            name,
            timestamp: now(),
        });
        Ok(id)
    }

    /// Upload files into a gallery and append their references
    ///
    /// Files go up one at a time; the document is touched only when all of
    /// them succeeded. Returns the appended references.
    pub async fn append_gallery_images(
        &self,
        fabric_id: &str,
        segment: GallerySegment,
        files: &[ImageFile],
    ) -> CatalogResult<Vec<String>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let progress = UploadProgress::new(files.len());
        let urls = self
            .uploads
            .upload_sequential(fabric_id, UploadSegment::from(segment), files, &progress)
            .await?;

        self.documents
            .update(
                Collection::Fabrics,
                fabric_id,
                vec![FieldUpdate::array_union(segment.field_name(), urls.clone())],
            )
            .await?;

        info!(fabric_id = %fabric_id, segment = ?segment, added = urls.len(), "Gallery images appended");
        self.event_bus.emit_lossy(ShowroomEvent::GalleryUpdated {
            fabric_id: fabric_id.to_string(),
            segment,
            added: urls.len(),
            timestamp: now(),
        });
        Ok(urls)
    }

    /// Remove an image reference from a gallery and try to delete its blob
    pub async fn delete_gallery_image(
        &self,
        fabric_id: &str,
        segment: GallerySegment,
        url: &str,
    ) -> CatalogResult<DeletionOutcome> {
        let path = blob_path_from_url(url);
        let blob_removed = match self.blobs.delete(&path).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    path = %path,
                    error = %e,
                    "Storage deletion failed, removing reference anyway"
                );
                false
            }
        };

        self.documents
            .update(
                Collection::Fabrics,
                fabric_id,
                vec![FieldUpdate::array_remove(segment.field_name(), [url])],
            )
            .await?;

        info!(fabric_id = %fabric_id, segment = ?segment, blob_removed, "Gallery image deleted");
        self.event_bus.emit_lossy(ShowroomEvent::ImageDeleted {
            fabric_id: fabric_id.to_string(),
            segment,
            url: url.to_string(),
            blob_removed,
            timestamp: now(),
        });

        Ok(DeletionOutcome {
            document_removed: true,
            blob_removed,
        })
    }

    /// Rename a fabric and/or replace its main image
    ///
    /// The name is written trimmed, and only when its trimmed form differs
    /// from the current one. Nothing is written when there is no change.
    pub async fn save_fabric_edits(
        &self,
        fabric_id: &str,
        current: &FabricRecord,
        edit_name: &str,
        new_main_image: Option<&ImageFile>,
    ) -> CatalogResult<FabricEdits> {
        let mut edits = FabricEdits::default();

        let trimmed = edit_name.trim();
        if trimmed != current.name.trim() {
            edits.name = Some(trimmed.to_string());
        }

        if let Some(file) = new_main_image {
            let progress = UploadProgress::new(1);
            let mut urls = self
                .uploads
                .upload_sequential(
                    fabric_id,
                    UploadSegment::Main,
                    std::slice::from_ref(file),
                    &progress,
                )
                .await?;
            edits.main_image = urls.pop();
        }

        if edits.is_empty() {
            debug!(fabric_id = %fabric_id, "No fabric edits to save");
            return Ok(edits);
        }

        self.documents
            .update(Collection::Fabrics, fabric_id, edits.clone().into_updates())
            .await?;

        info!(
            fabric_id = %fabric_id,
            renamed = edits.name.is_some(),
            new_main_image = edits.main_image.is_some(),
            "Fabric edits saved"
        );
        self.event_bus.emit_lossy(ShowroomEvent::FabricEdited {
            fabric_id: fabric_id.to_string(),
            timestamp: now(),
        });
        Ok(edits)
    }
}
