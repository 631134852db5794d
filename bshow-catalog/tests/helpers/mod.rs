//! Shared utilities for bshow-catalog integration tests

pub mod faulty;
pub mod log_capture;

pub use faulty::{FailingBlobStore, RecordingDocumentStore};
pub use log_capture::{init_test_logging, LogCapture};
