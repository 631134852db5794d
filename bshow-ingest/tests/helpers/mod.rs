//! Shared utilities for bshow-ingest integration tests

pub mod fixtures;
pub mod grids;
pub mod log_capture;

pub use fixtures::{fixture_bytes, fixture_path};
pub use grids::{fabric_sheet, plan_header, plan_machine, plan_order};
pub use log_capture::{init_test_logging, LogCapture};
