//! Workbook files under tests/fixtures
//!
//! fabric_machines.xlsx: fabric → machine sheet, header plus three rows.
//! orders_plan.xlsx: orders plan with two machines; H3 is a date-styled
//! serial (45000) and H4 is text.

use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("fixture workbook readable")
}
