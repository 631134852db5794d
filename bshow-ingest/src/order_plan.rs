//! Orders-plan sheet segmentation
//!
//! The orders plan lists machines as header rows, each followed by the order
//! rows scheduled on it:
//!
//! | col | 0       | 1      | 2          | 4    | 5        | 7        |
//! |-----|---------|--------|------------|------|----------|----------|
//! |     | machine | fabric | kg per day | days | customer | end date |
//!
//! Nothing in the sheet marks a row's kind. A row with column 0 filled and
//! column 1 empty is read as a machine header; any later row with column 1
//! filled is an order for the most recent machine. Everything else is
//! dropped. This misreads a header that has stray data in column 1, and an
//! order row with an empty column 1. The rule lives in [`RowClassifier`] so a
//! sheet with an explicit row-type column can plug in its own.

use crate::sheet::{cell_at, Cell, Grid};
use bshow_common::config::DEFAULT_DATE_FORMAT;
use bshow_common::time::render_serial_date;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const COL_MACHINE: usize = 0;
pub const COL_FABRIC: usize = 1;
pub const COL_PRODUCTION_RATE: usize = 2;
pub const COL_DAYS: usize = 4;
pub const COL_CUSTOMER: usize = 5;
pub const COL_END_DATE: usize = 7;

/// Columns kept verbatim as auxiliary detail
pub const OTHER_DETAILS: std::ops::Range<usize> = 5..7;

/// What a row of the orders plan represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Starts a new machine block
    MachineHeader,
    /// Belongs to the current machine block
    Order,
    /// Dropped
    Ignored,
}

/// Decides the kind of each orders-plan row
pub trait RowClassifier {
    /// `has_current_machine` is true once a machine header has been seen
    fn classify(&self, row: &[Cell], has_current_machine: bool) -> RowKind;
}

/// Column 0 filled and column 1 empty → header; column 1 filled under a
/// header → order
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceHeuristic;

impl RowClassifier for PresenceHeuristic {
    fn classify(&self, row: &[Cell], has_current_machine: bool) -> RowKind {
        let machine = cell_at(row, COL_MACHINE);
        let fabric = cell_at(row, COL_FABRIC);

        if machine.is_present() && !fabric.is_present() {
            RowKind::MachineHeader
        } else if has_current_machine && fabric.is_present() {
            RowKind::Order
        } else {
            RowKind::Ignored
        }
    }
}

/// One order row of a machine block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub fabric: Cell,
    /// kg per day
    pub production_rate: Cell,
    pub customer: Cell,
    pub days: Cell,
    /// Rendered date when the sheet held a serial date, otherwise as read
    pub end_date: Cell,
    /// Raw columns 5 and 6
    pub other_details: Vec<Cell>,
}

/// A machine header and the orders under it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineBlock {
    pub machine_name: String,
    pub orders: Vec<OrderEntry>,
    /// Whether a stored machine matches the name; false until checked
    pub exists: bool,
}

impl MachineBlock {
    pub fn new(machine_name: impl Into<String>) -> Self {
        Self {
            machine_name: machine_name.into(),
            orders: Vec::new(),
            exists: false,
        }
    }
}

/// Convert a numeric end date from a serial day count, pass anything else
/// through untouched
pub fn convert_end_date(cell: &Cell, date_format: &str) -> Cell {
    match cell {
        Cell::Number(serial) => render_serial_date(*serial, date_format)
            .map(Cell::Text)
            .unwrap_or_else(|| cell.clone()),
        other => other.clone(),
    }
}

/// Read an order row from its fixed columns
pub fn read_order(row: &[Cell], date_format: &str) -> OrderEntry {
    OrderEntry {
        fabric: cell_at(row, COL_FABRIC).clone(),
        production_rate: cell_at(row, COL_PRODUCTION_RATE).clone(),
        customer: cell_at(row, COL_CUSTOMER).clone(),
        days: cell_at(row, COL_DAYS).clone(),
        end_date: convert_end_date(cell_at(row, COL_END_DATE), date_format),
        other_details: OTHER_DETAILS.map(|col| cell_at(row, col).clone()).collect(),
    }
}

/// Segment an orders plan with the given row classifier
pub fn segment_with<C: RowClassifier + ?Sized>(
    grid: &Grid,
    classifier: &C,
    date_format: &str,
) -> Vec<MachineBlock> {
    let mut blocks: Vec<MachineBlock> = Vec::new();

    for (row_index, row) in grid.data_rows() {
        match classifier.classify(row, !blocks.is_empty()) {
            RowKind::MachineHeader => {
                let name = cell_at(row, COL_MACHINE).display();
                debug!(row_index, machine = %name, "Machine header row");
                blocks.push(MachineBlock::new(name));
            }
            RowKind::Order => {
                if let Some(current) = blocks.last_mut() {
                    current.orders.push(read_order(row, date_format));
                }
            }
            RowKind::Ignored => {
                debug!(row_index, "Ignoring row");
            }
        }
    }

    blocks
}

/// Segment an orders plan with the presence heuristic
pub fn segment(grid: &Grid, date_format: &str) -> Vec<MachineBlock> {
    segment_with(grid, &PresenceHeuristic, date_format)
}

/// Segment with the presence heuristic and the default date format
pub fn segment_default(grid: &Grid) -> Vec<MachineBlock> {
    segment(grid, DEFAULT_DATE_FORMAT)
}
