//! # Butterfly Showroom Common Library
//!
//! Shared code for the showroom catalog and scheduling crates:
//! - Error taxonomy and result alias
//! - Configuration loading and logging setup
//! - Domain records (fabrics, machines, orders)
//! - Event types and the EventBus
//! - Document store and blob store seams with concrete adapters
//! - Spreadsheet serial dates and machine-name normalization

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod names;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use models::{
    FabricRecord, GallerySegment, MachineRecord, MachineType, OrderRecord, Stored, UploadSegment,
};
pub use store::{BlobStore, Collection, DocumentStore, FieldUpdate};
