//! Error types for spreadsheet ingestion

use thiserror::Error;

/// A data row that cannot be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed row {row_index}: {reason}")]
pub struct MalformedRowError {
    /// Grid row index (row 0 is the discarded header)
    pub row_index: usize,
    pub reason: String,
}

impl MalformedRowError {
    pub fn new(row_index: usize, reason: impl Into<String>) -> Self {
        Self {
            row_index,
            reason: reason.into(),
        }
    }
}

/// Import error type
#[derive(Debug, Error)]
pub enum ImportError {
    /// Workbook could not be opened or decoded
    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    /// Workbook opened but holds no worksheet
    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error(transparent)]
    MalformedRow(#[from] MalformedRowError),

    /// bshow-common error (store access while checking machines)
    #[error("Common error: {0}")]
    Common(#[from] bshow_common::Error),
}

impl ImportError {
    /// Human-readable status line for the import screen
    pub fn status_message(&self) -> String {
        match self {
            ImportError::MalformedRow(e) => format!("Import failed: {}", e),
            ImportError::Common(e) => format!("Failed to check machines: {}", e),
            other => format!("Could not read spreadsheet: {}", other),
        }
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
