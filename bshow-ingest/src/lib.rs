//! bshow-ingest - spreadsheet import for the showroom
//!
//! Two worksheet layouts are understood:
//! - fabric → machine sheets, regrouped by machine ([`fabric_machines`])
//! - orders plans, split into per-machine order blocks ([`order_plan`])
//!
//! Orders-plan machines can then be checked against the stored machines
//! ([`machine_check`]).

pub mod error;
pub mod fabric_machines;
pub mod importer;
pub mod machine_check;
pub mod order_plan;
pub mod sheet;
pub mod view;

pub use crate::error::{ImportError, ImportResult, MalformedRowError};
pub use crate::fabric_machines::{consolidate, MachineAssignment, MachineAssignments};
pub use crate::importer::BulkImporter;
pub use crate::machine_check::{annotate_existence, check_machines};
pub use crate::order_plan::{
    segment, segment_with, MachineBlock, OrderEntry, PresenceHeuristic, RowClassifier, RowKind,
};
pub use crate::sheet::{Cell, Grid};
