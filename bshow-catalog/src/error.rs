//! Error types for catalog and scheduling operations

use thiserror::Error;

/// Catalog error type
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required input missing or unusable; rejected before any store call
    #[error("{0}")]
    Validation(String),

    /// Requested document does not exist
    #[error("{0}")]
    NotFound(String),

    /// A blob upload or its download-reference resolution failed
    #[error("{0}")]
    Upload(bshow_common::Error),

    /// bshow-common error (document store access)
    #[error(transparent)]
    Common(#[from] bshow_common::Error),
}

/// User-facing operations, each with its own failure prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    AddFabric,
    UploadGallery,
    DeleteImage,
    SaveEdits,
    LoadFabric,
    AddMachine,
    SubmitOrder,
}

impl CatalogAction {
    pub fn failure_prefix(self) -> &'static str {
        match self {
            CatalogAction::AddFabric => "Error adding fabric",
            CatalogAction::UploadGallery => "Upload failed",
            CatalogAction::DeleteImage => "Delete failed",
            CatalogAction::SaveEdits => "Failed to save edits",
            CatalogAction::LoadFabric => "Error fetching fabric",
            CatalogAction::AddMachine => "Error adding machine",
            CatalogAction::SubmitOrder => "Error submitting order",
        }
    }
}

impl CatalogError {
    /// Status line shown after `action` fails
    ///
    /// Validation and lookup messages are shown as they are.
    pub fn status_message(&self, action: CatalogAction) -> String {
        match self {
            CatalogError::Validation(msg) | CatalogError::NotFound(msg) => msg.clone(),
            other => format!("{}: {}", action.failure_prefix(), other),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CatalogError::Validation(_))
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
