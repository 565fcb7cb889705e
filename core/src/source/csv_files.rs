//! CSV data source: one `<table>.csv` per input table in a directory.
//!
//! Cell types are inferred per value: empty is null, then integer, then
//! float, then text.

use crate::{
    config::SchemaConfig,
    error::{ReportError, ReportResult},
    store::DatasetStore,
    table::{Cell, RawTable},
};
use std::path::Path;

/// Read one CSV file as a raw table called `name`.
pub fn read_table(path: &Path, name: &str) -> ReportResult<RawTable> {
    if !path.is_file() {
        return Err(ReportError::MissingTable {
            table: name.to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut table = RawTable {
        name: name.to_string(),
        columns,
        rows: Vec::new(),
    };
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(infer_cell).collect());
    }

    log::debug!("read {} row(s) from {}", table.len(), path.display());
    Ok(table)
}

/// Read `<dir>/<table>.csv` for the four tables named in `schema` and
/// build a store.
pub fn load_dir(dir: &Path, schema: &SchemaConfig) -> ReportResult<DatasetStore> {
    let read = |table: &str| read_table(&dir.join(format!("{table}.csv")), table);

    let customers = read(&schema.customers.table)?;
    let prices = read(&schema.prices.table)?;
    let categories = read(&schema.categories.table)?;
    let volumes = read(&schema.volumes.table)?;
    DatasetStore::load(&customers, &prices, &categories, &volumes, schema)
}

fn infer_cell(value: &str) -> Cell {
    if value.is_empty() {
        Cell::Null
    } else if let Ok(v) = value.parse::<i64>() {
        Cell::Int(v)
    } else if let Ok(v) = value.parse::<f64>() {
        Cell::Real(v)
    } else {
        Cell::Text(value.to_string())
    }
}
