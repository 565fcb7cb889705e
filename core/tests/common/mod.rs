//! Shared fixture for the integration tests.
//!
//! Customers 1 and 3 share the name "Acme". SKU S3 has no price.
//! Category 30 has no name and is dropped at load. Customer 99 does not
//! exist. One fact row has no date.

#![allow(dead_code)]

use realloc_core::{Cell, DatasetStore, RawTable, SchemaConfig};

pub const EPS: f64 = 1e-6;

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

pub struct Fixture {
    pub customers: RawTable,
    pub prices: RawTable,
    pub categories: RawTable,
    pub volumes: RawTable,
}

impl Fixture {
    pub fn store(&self) -> DatasetStore {
        DatasetStore::load(
            &self.customers,
            &self.prices,
            &self.categories,
            &self.volumes,
            &SchemaConfig::default(),
        )
        .unwrap()
    }

    pub fn tables(&self) -> [&RawTable; 4] {
        [&self.customers, &self.prices, &self.categories, &self.volumes]
    }
}

pub fn fact(date: Option<&str>, scenario: &str, customer: i64, sku: &str, category: i64, volume: f64) -> Vec<Cell> {
    vec![
        date.into(),
        scenario.into(),
        Cell::Int(customer),
        sku.into(),
        Cell::Int(category),
        Cell::Real(volume),
    ]
}

pub fn fixture() -> Fixture {
    let customers = RawTable::new("DimCustomer", &["ID_Client", "Client"])
        .with_row(vec![Cell::Int(1), "Acme".into()])
        .with_row(vec![Cell::Int(2), "Bolt".into()])
        .with_row(vec![Cell::Int(3), "Acme".into()])
        .with_row(vec![Cell::Int(4), "Dormant".into()]);

    let prices = RawTable::new("DimPrice", &["SKU", "NOS/KG", "GP/KG"])
        .with_row(vec!["S1".into(), Cell::Real(2.0), Cell::Real(0.5)])
        .with_row(vec!["S2".into(), Cell::Real(3.0), Cell::Real(1.0)]);

    let categories = RawTable::new("DimCateg", &["ID", "Categorie"])
        .with_row(vec![Cell::Int(10), "Dairy".into()])
        .with_row(vec![Cell::Int(20), "Bakery".into()])
        .with_row(vec![Cell::Int(30), Cell::Null]);

    let d1 = Some("2024-01-01 00:00:00");
    let d2 = Some("2024-02-01 00:00:00");
    let volumes = RawTable::new(
        "FactVolumes",
        &["Date", "Scenario", "ID_CUSTO", "SKU", "ID_CATEG", "Volume"],
    )
    .with_row(fact(d1, "Base", 1, "S1", 10, 100.0))
    .with_row(fact(d1, "Revised", 1, "S1", 10, 150.0))
    .with_row(fact(d2, "Base", 1, "S2", 20, 40.0))
    .with_row(fact(d2, "Revised", 1, "S2", 20, 30.0))
    .with_row(fact(d1, "Base", 2, "S1", 20, 60.0))
    .with_row(fact(d1, "Revised", 2, "S3", 20, 80.0))
    .with_row(fact(d2, "Base", 3, "S2", 10, 20.0))
    .with_row(fact(d2, "Revised", 3, "S2", 10, -5.0))
    .with_row(fact(d1, "Base", 99, "S1", 10, 1000.0))
    .with_row(fact(d2, "Revised", 2, "S1", 30, 25.0))
    .with_row(fact(d2, "Stretch", 1, "S1", 10, 7.0))
    .with_row(fact(None, "Base", 1, "S1", 10, 5.0));

    Fixture {
        customers,
        prices,
        categories,
        volumes,
    }
}

pub fn fixture_store() -> DatasetStore {
    fixture().store()
}
