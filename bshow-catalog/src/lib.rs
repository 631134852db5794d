//! bshow-catalog - fabric catalog and machine scheduling
//!
//! Services over the document and blob store seams from bshow-common:
//! - [`fabrics::FabricCatalog`]: fabrics, their images and galleries
//! - [`machines::MachineScheduler`]: machines and fabric suggestions
//! - [`orders::OrderDesk`]: order submission
//!
//! [`view`] holds the form state for the add-fabric and new-order screens.

pub mod error;
pub mod fabrics;
pub mod machines;
pub mod orders;
pub mod upload;
pub mod view;

pub use crate::error::{CatalogAction, CatalogError, CatalogResult};
pub use crate::fabrics::{DeletionOutcome, FabricCatalog, FabricDraft, FabricEdits};
pub use crate::machines::{pick_best_machine, suggest_machines, MachineDraft, MachineScheduler};
pub use crate::orders::{submit_order, OrderDesk, OrderDraft, SubmittedOrder};
pub use crate::upload::{ImageFile, UploadCoordinator, UploadProgress};
