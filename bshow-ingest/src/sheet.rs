//! Worksheet grids
//!
//! Both import layouts are column-positional, so a worksheet is read into a
//! plain grid of cells addressed by absolute (row, column). Reads past the end
//! of a row yield [`Cell::Empty`].

use crate::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// One worksheet cell value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    /// Whether the cell counts as filled in
    ///
    /// Empty text, zero and `false` count as absent, matching how the sheets
    /// are read by the showroom's import screen.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Bool(b) => *b,
        }
    }

    /// No value at all (empty cell or empty text)
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text rendering; integral numbers drop the fractional part
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            // Dates stay serial day counts; the order-plan layout converts them
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

/// Cell at `col` of a row, `Empty` when the row is shorter
pub fn cell_at(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY)
}

/// A rectangular-ish worksheet; rows may differ in length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows.get(row).map_or(&EMPTY, |r| cell_at(r, col))
    }

    /// Rows after the header, paired with their grid index
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index, row.as_slice()))
    }

    /// Build a grid from a decoded worksheet range
    ///
    /// A range that does not start at A1 is padded so cells keep their
    /// absolute sheet positions.
    pub fn from_range(range: &Range<Data>) -> Self {
        let (start_row, start_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); start_row];
        for data_row in range.rows() {
            let mut row = vec![Cell::Empty; start_col];
            row.extend(data_row.iter().map(Cell::from));
            rows.push(row);
        }
        Self { rows }
    }
}

impl<C: Into<Cell>> From<Vec<Vec<C>>> for Grid {
    fn from(rows: Vec<Vec<C>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Read the first worksheet of a workbook file
pub fn load_first_sheet(path: &Path) -> ImportResult<Grid> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;
    debug!(path = %path.display(), rows = range.height(), "Loaded worksheet");
    Ok(Grid::from_range(&range))
}

/// Read the first worksheet of an in-memory workbook
pub fn load_first_sheet_from_bytes(bytes: Vec<u8>) -> ImportResult<Grid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::NoWorksheet)??;
    debug!(rows = range.height(), "Loaded worksheet from upload");
    Ok(Grid::from_range(&range))
}
