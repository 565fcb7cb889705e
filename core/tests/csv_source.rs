//! Loading the four tables from a directory of CSV exports.

mod common;

use common::approx;
use realloc_core::{source::csv_files, ReportConfig, ReportEngine, ReportError};
use std::path::PathBuf;

fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("realloc-csv-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_fixture(dir: &PathBuf) {
    std::fs::write(dir.join("DimCustomer.csv"), "ID_Client,Client\n1,Acme\n2,Bolt\n").unwrap();
    std::fs::write(dir.join("DimPrice.csv"), "SKU,NOS/KG,GP/KG\nS1,2.0,0.5\nS2,3,1\n").unwrap();
    std::fs::write(dir.join("DimCateg.csv"), "ID,Categorie\n10,Dairy\n20,\n").unwrap();
    std::fs::write(
        dir.join("FactVolumes.csv"),
        "Date,Scenario,ID_CUSTO,SKU,ID_CATEG,Volume\n\
         2024-01-01,Base,1,S1,10,100\n\
         2024-01-01,Revised,1,S1,10,150\n\
         2024-02-01,Base,2,S2,20,40.5\n\
         2024-02-01,Revised,2,S2,20,\n",
    )
    .unwrap();
}

#[test]
fn loads_directory_and_runs_views() {
    let dir = data_dir("load");
    write_fixture(&dir);

    let config = ReportConfig::default();
    let store = csv_files::load_dir(&dir, &config.schema).unwrap();

    assert_eq!(store.customers().len(), 2);
    // Category 20 has no name; the last fact row has no volume.
    assert_eq!(store.load_stats().dropped_categories, 1);
    assert_eq!(store.load_stats().dropped_volumes, 1);

    let engine = ReportEngine::new(&store, &config);
    let revenue = engine.revenue_trend("Acme").unwrap();
    let totals: Vec<f64> = revenue.iter().map(|p| p.total).collect();
    assert_eq!(totals, vec![200.0, 300.0]);

    let bridge = engine.client_bridge().unwrap();
    assert!(approx(bridge.rows[1].base_total, 40.5));
    assert_eq!(bridge.rows[1].revised_total, 0.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_a_missing_table() {
    let dir = data_dir("missing");
    write_fixture(&dir);
    std::fs::remove_file(dir.join("DimPrice.csv")).unwrap();

    match csv_files::load_dir(&dir, &ReportConfig::default().schema) {
        Err(ReportError::MissingTable { table }) => assert_eq!(table, "DimPrice"),
        other => panic!("expected missing table, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_header_is_a_schema_error() {
    let dir = data_dir("header");
    write_fixture(&dir);
    std::fs::write(dir.join("DimCustomer.csv"), "ID_Client,Name\n1,Acme\n").unwrap();

    match csv_files::load_dir(&dir, &ReportConfig::default().schema) {
        Err(ReportError::Schema { table, column }) => {
            assert_eq!(table, "DimCustomer");
            assert_eq!(column, "Client");
        }
        other => panic!("expected schema error, got {other:?}"),
    }

    let _ = std::fs::remove_dir_all(&dir);
}
