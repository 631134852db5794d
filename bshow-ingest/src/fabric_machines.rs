//! Fabric → machine sheet consolidation
//!
//! Each data row names a fabric (column 0) and the machines that knit it
//! (column 1, joined with `-`). The sheet is regrouped by machine: every
//! machine token maps to the fabrics listed against it. A fabric listed
//! against several machines lands in each of their groups.
//!
//! Tokens are taken verbatim. `Mayer 34A` and `mayer34a` form two groups.

use crate::error::MalformedRowError;
use crate::sheet::{cell_at, Cell, Grid};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Separator between machine tokens in column 1
pub const MACHINE_DELIMITER: char = '-';

/// Fabric names per machine token, keyed in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineAssignments {
    by_machine: IndexMap<String, Vec<String>>,
}

/// One machine token and its fabrics, for listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineAssignment {
    pub machine_name: String,
    pub fabrics: Vec<String>,
}

impl MachineAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fabric` against `machine`, creating the group on first sight
    pub fn assign(&mut self, machine: &str, fabric: &str) {
        self.by_machine
            .entry(machine.to_string())
            .or_default()
            .push(fabric.to_string());
    }

    /// Machine tokens in first-seen order
    pub fn machines(&self) -> impl Iterator<Item = &str> {
        self.by_machine.keys().map(String::as_str)
    }

    pub fn fabrics_for(&self, machine: &str) -> Option<&[String]> {
        self.by_machine.get(machine).map(Vec::as_slice)
    }

    /// Number of machine groups
    pub fn len(&self) -> usize {
        self.by_machine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_machine.is_empty()
    }

    /// Total fabric entries across all groups
    pub fn entry_count(&self) -> usize {
        self.by_machine.values().map(Vec::len).sum()
    }

    pub fn as_map(&self) -> &IndexMap<String, Vec<String>> {
        &self.by_machine
    }

    /// Groups as an ordered list
    pub fn groups(&self) -> Vec<MachineAssignment> {
        self.by_machine
            .iter()
            .map(|(machine, fabrics)| MachineAssignment {
                machine_name: machine.clone(),
                fabrics: fabrics.clone(),
            })
            .collect()
    }
}

/// Regroup a fabric → machine sheet by machine
///
/// Row 0 is the header and is skipped. Completely empty rows are skipped.
/// A row with a blank fabric name or blank machine list is rejected with
/// its grid index.
pub fn consolidate(grid: &Grid) -> Result<MachineAssignments, MalformedRowError> {
    let mut assignments = MachineAssignments::new();

    for (row_index, row) in grid.data_rows() {
        if row.iter().all(Cell::is_blank) {
            debug!(row_index, "Skipping empty row");
            continue;
        }

        let fabric_cell = cell_at(row, 0);
        if !fabric_cell.is_present() {
            return Err(MalformedRowError::new(row_index, "missing fabric name"));
        }
        let machines_cell = cell_at(row, 1);
        if !machines_cell.is_present() {
            return Err(MalformedRowError::new(row_index, "missing machine list"));
        }

        let fabric = fabric_cell.display();
        let machines = machines_cell.display();
        for machine in machines.split(MACHINE_DELIMITER) {
            assignments.assign(machine, &fabric);
        }
    }

    debug!(
        machines = assignments.len(),
        entries = assignments.entry_count(),
        "Consolidated fabric/machine sheet"
    );
    Ok(assignments)
}
