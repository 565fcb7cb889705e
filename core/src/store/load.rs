use super::{Category, Customer, DatasetStore, Price, Tables, VolumeFact};
use crate::{
    config::SchemaConfig,
    error::{ReportError, ReportResult},
    table::{cell, RawTable},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Row counts kept and dropped per table during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    pub customers: usize,
    pub prices: usize,
    pub categories: usize,
    pub volumes: usize,
    pub dropped_customers: usize,
    pub dropped_prices: usize,
    pub dropped_categories: usize,
    pub dropped_volumes: usize,
}

impl DatasetStore {
    /// Build a store from the four raw tables.
    ///
    /// Every required column is checked on all four tables before any row
    /// is converted, so a schema error leaves nothing half-built. Rows with
    /// unusable cells are dropped and counted; a repeated dimension key is
    /// an error.
    pub fn load(
        customers: &RawTable,
        prices: &RawTable,
        categories: &RawTable,
        volumes: &RawTable,
        schema: &SchemaConfig,
    ) -> ReportResult<Self> {
        let c = &schema.customers;
        let customer_cols = [
            customers.require_column(&c.customer_id)?,
            customers.require_column(&c.client_name)?,
        ];
        let p = &schema.prices;
        let price_cols = [
            prices.require_column(&p.sku)?,
            prices.require_column(&p.revenue_per_kg)?,
            prices.require_column(&p.margin_per_kg)?,
        ];
        let k = &schema.categories;
        let category_cols = [
            categories.require_column(&k.category_id)?,
            categories.require_column(&k.category_name)?,
        ];
        let v = &schema.volumes;
        let volume_cols = [
            volumes.require_column(&v.date)?,
            volumes.require_column(&v.scenario)?,
            volumes.require_column(&v.customer_id)?,
            volumes.require_column(&v.sku)?,
            volumes.require_column(&v.category_id)?,
            volumes.require_column(&v.volume)?,
        ];

        let mut stats = LoadStats::default();

        let customer_rows: Vec<Customer> = customers
            .rows
            .iter()
            .filter_map(|row| {
                Some(Customer {
                    customer_id: cell(row, customer_cols[0]).as_key()?,
                    client_name: cell(row, customer_cols[1]).as_text()?,
                })
            })
            .collect();
        stats.dropped_customers = customers.len() - customer_rows.len();

        let price_rows: Vec<Price> = prices
            .rows
            .iter()
            .filter_map(|row| {
                Some(Price {
                    sku: cell(row, price_cols[0]).as_key()?,
                    revenue_per_kg: cell(row, price_cols[1]).as_f64()?,
                    margin_per_kg: cell(row, price_cols[2]).as_f64()?,
                })
            })
            .collect();
        stats.dropped_prices = prices.len() - price_rows.len();

        let category_rows: Vec<Category> = categories
            .rows
            .iter()
            .filter_map(|row| {
                Some(Category {
                    category_id: cell(row, category_cols[0]).as_key()?,
                    category_name: cell(row, category_cols[1]).as_text()?,
                })
            })
            .collect();
        stats.dropped_categories = categories.len() - category_rows.len();

        let volume_rows: Vec<VolumeFact> = volumes
            .rows
            .iter()
            .filter_map(|row| {
                Some(VolumeFact {
                    date: cell(row, volume_cols[0]).as_date()?,
                    scenario: cell(row, volume_cols[1]).as_text()?,
                    customer_id: cell(row, volume_cols[2]).as_key()?,
                    sku: cell(row, volume_cols[3]).as_key()?,
                    category_id: cell(row, volume_cols[4]).as_key()?,
                    volume: cell(row, volume_cols[5]).as_f64()?,
                })
            })
            .collect();
        stats.dropped_volumes = volumes.len() - volume_rows.len();

        for (table, dropped) in [
            (&customers.name, stats.dropped_customers),
            (&prices.name, stats.dropped_prices),
            (&categories.name, stats.dropped_categories),
            (&volumes.name, stats.dropped_volumes),
        ] {
            if dropped > 0 {
                log::warn!("{table}: dropped {dropped} row(s) with missing or invalid cells");
            }
        }

        Self::build(customer_rows, price_rows, category_rows, volume_rows, stats)
    }

    /// Build a store from already-typed records.
    /// Categories and customers with blank names are dropped, as are prices
    /// and volume rows carrying non-finite numbers.
    pub fn from_records(
        customers: Vec<Customer>,
        prices: Vec<Price>,
        categories: Vec<Category>,
        volumes: Vec<VolumeFact>,
    ) -> ReportResult<Self> {
        let mut stats = LoadStats::default();

        let total = customers.len();
        let customers: Vec<Customer> = customers
            .into_iter()
            .filter(|c| !c.client_name.trim().is_empty())
            .collect();
        stats.dropped_customers = total - customers.len();

        let total = categories.len();
        let categories: Vec<Category> = categories
            .into_iter()
            .filter(|c| !c.category_name.trim().is_empty())
            .collect();
        stats.dropped_categories = total - categories.len();

        let total = prices.len();
        let prices: Vec<Price> = prices
            .into_iter()
            .filter(|p| p.revenue_per_kg.is_finite() && p.margin_per_kg.is_finite())
            .collect();
        stats.dropped_prices = total - prices.len();

        let total = volumes.len();
        let volumes: Vec<VolumeFact> = volumes
            .into_iter()
            .filter(|v| v.volume.is_finite())
            .collect();
        stats.dropped_volumes = total - volumes.len();

        if stats.dropped_prices + stats.dropped_volumes > 0 {
            log::warn!(
                "dropped {} price(s) and {} volume row(s) with non-finite numbers",
                stats.dropped_prices,
                stats.dropped_volumes
            );
        }

        Self::build(customers, prices, categories, volumes, stats)
    }

    fn build(
        customers: Vec<Customer>,
        prices: Vec<Price>,
        categories: Vec<Category>,
        volumes: Vec<VolumeFact>,
        mut stats: LoadStats,
    ) -> ReportResult<Self> {
        let customer_index = index("customers", customers.iter().map(|c| &c.customer_id))?;
        let price_index = index("prices", prices.iter().map(|p| &p.sku))?;
        let category_index = index("categories", categories.iter().map(|c| &c.category_id))?;

        stats.customers = customers.len();
        stats.prices = prices.len();
        stats.categories = categories.len();
        stats.volumes = volumes.len();

        log::info!(
            "Dataset loaded: {} customers, {} prices, {} categories, {} volume rows",
            stats.customers,
            stats.prices,
            stats.categories,
            stats.volumes
        );

        Ok(Self {
            tables: Arc::new(Tables {
                customers,
                prices,
                categories,
                volumes,
                customer_index,
                price_index,
                category_index,
                stats,
            }),
        })
    }
}

fn index<'a>(
    table: &str,
    keys: impl Iterator<Item = &'a String>,
) -> ReportResult<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, key) in keys.enumerate() {
        if index.insert(key.clone(), i).is_some() {
            return Err(ReportError::DuplicateKey {
                table: table.to_string(),
                key: key.clone(),
            });
        }
    }
    Ok(index)
}
