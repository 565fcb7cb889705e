//! Dataset store: loading, validation and lookups.

mod common;

use chrono::NaiveDate;
use common::{fixture, fixture_store};
use realloc_core::{
    store::{Category, Customer, LoadStats, Price, VolumeFact},
    Cell, DatasetStore, RawTable, ReportConfig, ReportEngine, ReportError, SchemaConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn expect_schema_error(result: Result<DatasetStore, ReportError>, table: &str, column: &str) {
    match result {
        Err(ReportError::Schema { table: t, column: c }) => {
            assert_eq!(t, table);
            assert_eq!(c, column);
        }
        other => panic!("expected schema error on {table}.{column}, got {other:?}"),
    }
}

fn without_column(table: &RawTable, column: &str) -> RawTable {
    let idx = table.require_column(column).unwrap();
    let mut out = table.clone();
    out.columns.remove(idx);
    for row in &mut out.rows {
        row.remove(idx);
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn load_counts_kept_and_dropped_rows() {
    let store = fixture_store();

    assert_eq!(
        *store.load_stats(),
        LoadStats {
            customers: 4,
            prices: 2,
            categories: 2,
            volumes: 11,
            dropped_customers: 0,
            dropped_prices: 0,
            dropped_categories: 1,
            dropped_volumes: 1,
        }
    );
}

/// No category without a name survives the load.
#[test]
fn categories_without_names_are_dropped() {
    let store = fixture_store();

    assert!(store.category("30").is_none());
    assert!(store.categories().iter().all(|c| !c.category_name.is_empty()));
    assert_eq!(store.category("10").unwrap().category_name, "Dairy");
}

#[test]
fn missing_column_fails_load_for_every_table() {
    let f = fixture();
    let schema = SchemaConfig::default();

    let customers = without_column(&f.customers, "Client");
    expect_schema_error(
        DatasetStore::load(&customers, &f.prices, &f.categories, &f.volumes, &schema),
        "DimCustomer",
        "Client",
    );

    let prices = without_column(&f.prices, "GP/KG");
    expect_schema_error(
        DatasetStore::load(&f.customers, &prices, &f.categories, &f.volumes, &schema),
        "DimPrice",
        "GP/KG",
    );

    let categories = without_column(&f.categories, "ID");
    expect_schema_error(
        DatasetStore::load(&f.customers, &f.prices, &categories, &f.volumes, &schema),
        "DimCateg",
        "ID",
    );

    let volumes = without_column(&f.volumes, "Scenario");
    expect_schema_error(
        DatasetStore::load(&f.customers, &f.prices, &f.categories, &volumes, &schema),
        "FactVolumes",
        "Scenario",
    );
}

#[test]
fn custom_column_names_are_honoured() {
    let f = fixture();
    let mut schema = SchemaConfig::default();
    schema.prices.revenue_per_kg = "Revenue".into();

    let mut prices = f.prices.clone();
    prices.columns[1] = "Revenue".into();

    let store = DatasetStore::load(&f.customers, &prices, &f.categories, &f.volumes, &schema).unwrap();
    assert_eq!(store.price("S2").unwrap().revenue_per_kg, 3.0);
}

#[test]
fn duplicate_dimension_key_is_rejected() {
    let f = fixture();
    let prices = f
        .prices
        .clone()
        .with_row(vec!["S1".into(), Cell::Real(9.0), Cell::Real(9.0)]);

    let result = DatasetStore::load(&f.customers, &prices, &f.categories, &f.volumes, &SchemaConfig::default());
    match result {
        Err(ReportError::DuplicateKey { key, .. }) => assert_eq!(key, "S1"),
        other => panic!("expected duplicate key error, got {other:?}"),
    }
}

#[test]
fn unpriced_rows_are_dropped_not_fatal() {
    let f = fixture();
    let prices = f
        .prices
        .clone()
        .with_row(vec!["S4".into(), "n/a".into(), Cell::Real(1.0)]);

    let store = DatasetStore::load(&f.customers, &prices, &f.categories, &f.volumes, &SchemaConfig::default()).unwrap();
    assert!(store.price("S4").is_none());
    assert_eq!(store.load_stats().dropped_prices, 1);
}

#[test]
fn lookups_resolve_by_key() {
    let store = fixture_store();

    assert_eq!(store.customer("2").unwrap().client_name, "Bolt");
    assert!(store.customer("99").is_none());
    assert_eq!(store.price("S1").unwrap().margin_per_kg, 0.5);
    assert!(store.price("S3").is_none());
}

#[test]
fn client_names_are_distinct_in_first_seen_order() {
    let store = fixture_store();

    assert_eq!(store.client_names(), vec!["Acme", "Bolt", "Dormant"]);
    assert!(store.has_client("Dormant"));
    assert!(!store.has_client("Nobody"));
}

#[test]
fn scenarios_come_from_the_fact_table() {
    let store = fixture_store();
    assert_eq!(store.scenarios(), vec!["Base", "Revised", "Stretch"]);
}

#[test]
fn from_records_applies_the_same_rules() {
    let store = DatasetStore::from_records(
        vec![Customer {
            customer_id: "1".into(),
            client_name: "Acme".into(),
        }],
        vec![Price {
            sku: "S1".into(),
            revenue_per_kg: 1.0,
            margin_per_kg: 0.1,
        }],
        vec![
            Category {
                category_id: "A".into(),
                category_name: "Dairy".into(),
            },
            Category {
                category_id: "B".into(),
                category_name: " ".into(),
            },
        ],
        Vec::new(),
    )
    .unwrap();

    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.load_stats().dropped_categories, 1);

    let dup = DatasetStore::from_records(
        vec![
            Customer {
                customer_id: "1".into(),
                client_name: "Acme".into(),
            },
            Customer {
                customer_id: "1".into(),
                client_name: "Other".into(),
            },
        ],
        Vec::new(),
        Vec::new(),
        Vec::new(),
    );
    assert!(matches!(dup, Err(ReportError::DuplicateKey { .. })));
}

#[test]
fn from_records_drops_non_finite_numbers() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let fact = |sku: &str, volume: f64| VolumeFact {
        date,
        scenario: "Base".into(),
        customer_id: "1".into(),
        sku: sku.into(),
        category_id: "A".into(),
        volume,
    };
    let store = DatasetStore::from_records(
        vec![Customer {
            customer_id: "1".into(),
            client_name: "Acme".into(),
        }],
        vec![
            Price {
                sku: "S1".into(),
                revenue_per_kg: 2.0,
                margin_per_kg: 0.5,
            },
            Price {
                sku: "S2".into(),
                revenue_per_kg: f64::NAN,
                margin_per_kg: 0.5,
            },
            Price {
                sku: "S3".into(),
                revenue_per_kg: 1.0,
                margin_per_kg: f64::INFINITY,
            },
        ],
        Vec::new(),
        vec![
            fact("S1", 10.0),
            fact("S2", 5.0),
            fact("S1", f64::NEG_INFINITY),
        ],
    )
    .unwrap();

    let stats = store.load_stats();
    assert_eq!(stats.prices, 1);
    assert_eq!(stats.dropped_prices, 2);
    assert_eq!(stats.volumes, 2);
    assert_eq!(stats.dropped_volumes, 1);
    assert!(store.price("S2").is_none());

    // Reports stay computable: the unpriced S2 row is left out of revenue.
    let config = ReportConfig::default();
    let engine = ReportEngine::new(&store, &config);
    let revenue = engine.revenue_trend("Acme").unwrap();
    assert_eq!(revenue.len(), 1);
    assert_eq!(revenue[0].total, 20.0);
    assert_eq!(engine.volume_trend("Acme").unwrap()[0].total, 15.0);
}

#[test]
fn empty_store_answers_with_nothing() {
    let store = DatasetStore::empty();

    assert!(store.client_names().is_empty());
    assert!(store.scenarios().is_empty());
    assert_eq!(store.load_stats(), &LoadStats::default());
}

/// The store is shared read-only between threads without locking.
#[test]
fn store_is_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DatasetStore>();

    let store = fixture_store();
    let names: Vec<Vec<String>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                s.spawn(move || store.client_names())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(names.iter().all(|n| *n == store.client_names()));
}
