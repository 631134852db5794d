//! Bulk import entry points
//!
//! Ties worksheet loading to the two layout parsers, applies the configured
//! date format, and announces each parsed result on the event bus.

use crate::error::ImportResult;
use crate::fabric_machines::{consolidate, MachineAssignments};
use crate::machine_check;
use crate::order_plan::{segment, MachineBlock};
use crate::sheet::{load_first_sheet, load_first_sheet_from_bytes, Grid};
use bshow_common::config::ImportConfig;
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::DocumentStore;
use std::path::Path;
use tracing::info;

/// Spreadsheet import service
#[derive(Clone)]
pub struct BulkImporter {
    date_format: String,
    event_bus: EventBus,
}

impl BulkImporter {
    pub fn new(config: &ImportConfig, event_bus: EventBus) -> Self {
        Self {
            date_format: config.checked_date_format().to_string(),
            event_bus,
        }
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Parse a fabric → machine grid
    pub fn assignments_from_grid(&self, grid: &Grid) -> ImportResult<MachineAssignments> {
        let assignments = consolidate(grid)?;
        info!(
            machines = assignments.len(),
            entries = assignments.entry_count(),
            "Fabric/machine sheet imported"
        );
        self.announce(assignments.len(), assignments.entry_count());
        Ok(assignments)
    }

    pub fn assignments_from_file(&self, path: &Path) -> ImportResult<MachineAssignments> {
        self.assignments_from_grid(&load_first_sheet(path)?)
    }

    pub fn assignments_from_bytes(&self, bytes: Vec<u8>) -> ImportResult<MachineAssignments> {
        self.assignments_from_grid(&load_first_sheet_from_bytes(bytes)?)
    }

    /// Parse an orders-plan grid
    pub fn order_plan_from_grid(&self, grid: &Grid) -> Vec<MachineBlock> {
        let blocks = segment(grid, &self.date_format);
        let orders: usize = blocks.iter().map(|b| b.orders.len()).sum();
        info!(machines = blocks.len(), orders, "Orders plan imported");
        self.announce(blocks.len(), orders);
        blocks
    }

    pub fn order_plan_from_file(&self, path: &Path) -> ImportResult<Vec<MachineBlock>> {
        Ok(self.order_plan_from_grid(&load_first_sheet(path)?))
    }

    pub fn order_plan_from_bytes(&self, bytes: Vec<u8>) -> ImportResult<Vec<MachineBlock>> {
        Ok(self.order_plan_from_grid(&load_first_sheet_from_bytes(bytes)?))
    }

    /// Resolve each block's `exists` flag against stored machines
    pub async fn check_machines<S>(
        &self,
        store: &S,
        blocks: Vec<MachineBlock>,
    ) -> ImportResult<Vec<MachineBlock>>
    where
        S: DocumentStore + ?Sized,
    {
        Ok(machine_check::check_machines(store, blocks).await?)
    }

    fn announce(&self, groups: usize, entries: usize) {
        self.event_bus.emit_lossy(ShowroomEvent::ImportParsed {
            groups,
            entries,
            timestamp: bshow_common::time::now(),
        });
    }
}
