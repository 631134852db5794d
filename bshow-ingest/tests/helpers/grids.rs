//! Grid builders for the two worksheet layouts

use bshow_ingest::{Cell, Grid};

/// Fabric → machine sheet with a header row
pub fn fabric_sheet(rows: &[(&str, &str)]) -> Grid {
    let mut grid = vec![vec![Cell::from("Fabric"), Cell::from("Machines")]];
    grid.extend(
        rows.iter()
            .map(|(fabric, machines)| vec![Cell::from(*fabric), Cell::from(*machines)]),
    );
    Grid::new(grid)
}

pub fn plan_header() -> Vec<Cell> {
    ["Machine", "Fabric", "Kg/Day", "", "Days", "Customer", "Notes", "End Date"]
        .into_iter()
        .map(Cell::from)
        .collect()
}

pub fn plan_machine(name: &str) -> Vec<Cell> {
    vec![Cell::from(name)]
}

pub fn plan_order(fabric: &str, customer: &str, end_date: Cell) -> Vec<Cell> {
    vec![
        Cell::Empty,
        Cell::from(fabric),
        Cell::from(300.0),
        Cell::Empty,
        Cell::from(3.0),
        Cell::from(customer),
        Cell::Empty,
        end_date,
    ]
}
