//! Integration tests for spreadsheet ingestion
//!
//! Drives both worksheet layouts through BulkImporter and checks the
//! orders plan against a populated document store.

mod helpers;

use bshow_common::config::ImportConfig;
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::names::normalize;
use bshow_common::store::MemoryDocumentStore;
use bshow_common::{Collection, DocumentStore};
use bshow_ingest::view::{BulkImportEvent, BulkImportView};
use bshow_ingest::{BulkImporter, Cell, Grid, ImportError};
use helpers::{
    fabric_sheet, fixture_bytes, fixture_path, init_test_logging, plan_header, plan_machine,
    plan_order,
};
use serde_json::json;
use serial_test::serial;
use tracing::Level;

fn importer() -> BulkImporter {
    BulkImporter::new(&ImportConfig::default(), EventBus::new(16))
}

#[test]
fn test_fabric_duplicated_into_every_listed_machine() {
    let assignments = importer()
        .assignments_from_grid(&fabric_sheet(&[("F1", "A-B"), ("F2", "B")]))
        .unwrap();

    let keys: Vec<&str> = assignments.machines().collect();
    assert_eq!(keys, vec!["A", "B"]);
    assert_eq!(assignments.fabrics_for("A").unwrap(), ["F1"]);
    assert_eq!(assignments.fabrics_for("B").unwrap(), ["F1", "F2"]);
}

#[test]
fn test_machine_tokens_are_not_normalized() {
    let assignments = importer()
        .assignments_from_grid(&fabric_sheet(&[("F1", "Mayer"), ("F2", "mayer ")]))
        .unwrap();
    assert_eq!(assignments.len(), 2);
}

#[test]
fn test_repeated_pair_keeps_duplicates() {
    let assignments = importer()
        .assignments_from_grid(&fabric_sheet(&[("F1", "A"), ("F1", "A")]))
        .unwrap();
    assert_eq!(assignments.fabrics_for("A").unwrap(), ["F1", "F1"]);
}

#[test]
fn test_missing_machine_list_is_malformed_row() {
    let err = importer()
        .assignments_from_grid(&fabric_sheet(&[("F1", "A"), ("F2", "")]))
        .unwrap_err();

    match err {
        ImportError::MalformedRow(ref row) => {
            assert_eq!(row.row_index, 2);
            assert_eq!(row.reason, "missing machine list");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_header_orders_header_segments_into_two_blocks() {
    let grid = Grid::new(vec![
        plan_header(),
        plan_machine("Mayer 34A"),
        plan_order("Jersey", "Nour", Cell::from(45000.0)),
        plan_order("Rib", "Samir", Cell::from("12/1/2024")),
        plan_machine("Terrot S296"),
    ]);

    let blocks = importer().order_plan_from_grid(&grid);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].orders.len(), 2);
    assert!(blocks[1].orders.is_empty());

    assert_eq!(blocks[0].orders[0].end_date, Cell::from("3/15/2023"));
    assert_eq!(blocks[0].orders[1].end_date, Cell::from("12/1/2024"));
}

#[test]
fn test_normalization_is_idempotent() {
    for name in ["Mayer 34A", "  TERROT\tS 296 ", "mayer34a", ""] {
        assert_eq!(normalize(&normalize(name)), normalize(name));
    }
}

#[tokio::test]
#[serial]
async fn test_check_machines_against_store() -> anyhow::Result<()> {
    let (logs, _guard) = init_test_logging();

    let store = MemoryDocumentStore::new();
    store
        .add(Collection::Machines, json!({"Name": "mayer34a", "Type": "Single"}))
        .await?;

    let grid = Grid::new(vec![
        plan_header(),
        plan_machine("Mayer 34A"),
        plan_order("Jersey", "Nour", Cell::Empty),
        plan_machine("Mayer34B"),
    ]);

    let importer = importer();
    let blocks = importer.order_plan_from_grid(&grid);
    let checked = importer.check_machines(&store, blocks).await?;

    assert!(checked[0].exists);
    assert!(!checked[1].exists);
    assert!(logs.contains_at(Level::INFO, "Checked orders-plan machines"));
    Ok(())
}

#[test]
#[serial]
fn test_import_logs_summary() {
    let (logs, _guard) = init_test_logging();

    importer()
        .assignments_from_grid(&fabric_sheet(&[("F1", "A-B")]))
        .unwrap();
    logs.assert_contains("Fabric/machine sheet imported");
}

#[test]
fn test_parsed_results_announced_on_bus() {
    let bus = EventBus::new(16);
    let mut rx = bus.subscribe();
    let importer = BulkImporter::new(&ImportConfig::default(), bus);

    let grid = Grid::new(vec![
        plan_header(),
        plan_machine("Mayer"),
        plan_order("Jersey", "Nour", Cell::Empty),
        plan_order("Rib", "Samir", Cell::Empty),
    ]);
    importer.order_plan_from_grid(&grid);

    match rx.try_recv().unwrap() {
        ShowroomEvent::ImportParsed { groups, entries, .. } => {
            assert_eq!(groups, 1);
            assert_eq!(entries, 2);
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_screen_flow_through_reducer() {
    let store = MemoryDocumentStore::new();
    store
        .add(Collection::Machines, json!({"Name": "Terrot S296"}))
        .await
        .unwrap();

    let importer = importer();
    let grid = Grid::new(vec![plan_header(), plan_machine("terrot s296")]);

    let mut view = BulkImportView::default()
        .reduce(BulkImportEvent::OrderPlanParsed(importer.order_plan_from_grid(&grid)));
    assert!(view.can_check());

    view = view.reduce(BulkImportEvent::CheckStarted);
    let checked = importer
        .check_machines(&store, view.order_plan.clone())
        .await
        .unwrap();
    view = view.reduce(BulkImportEvent::CheckCompleted(checked));

    assert!(!view.checking);
    assert!(view.order_plan[0].exists);
}

#[test]
fn test_missing_workbook_is_sheet_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = importer()
        .order_plan_from_file(&dir.path().join("missing.xlsx"))
        .unwrap_err();
    assert!(matches!(err, ImportError::Sheet(_)));
}

#[test]
fn test_fabric_workbook_from_file_and_bytes() -> anyhow::Result<()> {
    let importer = importer();
    let from_file = importer.assignments_from_file(&fixture_path("fabric_machines.xlsx"))?;
    let from_bytes = importer.assignments_from_bytes(fixture_bytes("fabric_machines.xlsx"))?;
    assert_eq!(from_file, from_bytes);

    let keys: Vec<&str> = from_file.machines().collect();
    assert_eq!(keys, vec!["Mayer 34A", "Terrot S296", "34"]);
    assert_eq!(from_file.fabrics_for("Mayer 34A").unwrap(), ["Jersey"]);
    assert_eq!(from_file.fabrics_for("Terrot S296").unwrap(), ["Jersey", "Rib"]);
    assert_eq!(from_file.fabrics_for("34").unwrap(), ["Pique"]);
    Ok(())
}

#[test]
fn test_orders_workbook_renders_date_cells() -> anyhow::Result<()> {
    let importer = importer();
    let from_file = importer.order_plan_from_file(&fixture_path("orders_plan.xlsx"))?;
    let from_bytes = importer.order_plan_from_bytes(fixture_bytes("orders_plan.xlsx"))?;
    assert_eq!(from_file, from_bytes);

    assert_eq!(from_file.len(), 2);
    assert_eq!(from_file[0].machine_name, "Mayer 34A");
    assert_eq!(from_file[1].machine_name, "Terrot S296");
    assert!(from_file[1].orders.is_empty());

    let orders = &from_file[0].orders;
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].fabric, Cell::from("Jersey"));
    assert_eq!(orders[0].production_rate, Cell::from(250.0));
    assert_eq!(orders[0].days, Cell::from(4.0));
    assert_eq!(orders[0].customer, Cell::from("Nour"));
    assert_eq!(orders[0].end_date, Cell::from("3/15/2023"));
    assert_eq!(orders[1].customer, Cell::from("Samir"));
    assert_eq!(orders[1].end_date, Cell::from("12/1/2024"));
    Ok(())
}
