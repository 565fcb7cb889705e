//! In-memory dataset store.
//!
//! RULE: Only the store touches the four tables.
//! Report code asks the store for grouped sums; it never walks facts itself.
//!
//! The tables are loaded once and never mutated. A store is a cheap
//! handle (`Arc`) that can be cloned and read from any thread.

mod load;
mod query;

pub use load::LoadStats;
pub use query::{GroupBy, GroupKey, Measure, Query, QueryRow, SumColumn};

use crate::types::{CategoryId, CustomerId, Scenario, Sku};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub client_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub sku: Sku,
    pub revenue_per_kg: f64,
    pub margin_per_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeFact {
    pub date: NaiveDate,
    pub scenario: Scenario,
    pub customer_id: CustomerId,
    pub sku: Sku,
    pub category_id: CategoryId,
    /// Negative values are corrections.
    pub volume: f64,
}

// ── Store ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<Customer>,
    prices: Vec<Price>,
    categories: Vec<Category>,
    volumes: Vec<VolumeFact>,
    // key -> row index, one per dimension
    customer_index: HashMap<CustomerId, usize>,
    price_index: HashMap<Sku, usize>,
    category_index: HashMap<CategoryId, usize>,
    stats: LoadStats,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    tables: Arc<Tables>,
}

impl DatasetStore {
    /// A store with four empty tables.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.tables.customers
    }

    pub fn prices(&self) -> &[Price] {
        &self.tables.prices
    }

    pub fn categories(&self) -> &[Category] {
        &self.tables.categories
    }

    pub fn volumes(&self) -> &[VolumeFact] {
        &self.tables.volumes
    }

    pub fn load_stats(&self) -> &LoadStats {
        &self.tables.stats
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.tables
            .customer_index
            .get(customer_id)
            .map(|&i| &self.tables.customers[i])
    }

    pub fn price(&self, sku: &str) -> Option<&Price> {
        self.tables
            .price_index
            .get(sku)
            .map(|&i| &self.tables.prices[i])
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.tables
            .category_index
            .get(category_id)
            .map(|&i| &self.tables.categories[i])
    }

    /// Whether any customer carries this display name.
    pub fn has_client(&self, client_name: &str) -> bool {
        self.tables
            .customers
            .iter()
            .any(|c| c.client_name == client_name)
    }

    /// Distinct client names, in the order they first appear.
    pub fn client_names(&self) -> Vec<String> {
        distinct(self.tables.customers.iter().map(|c| c.client_name.as_str()))
    }

    /// Distinct scenario labels present in the fact table, in the order
    /// they first appear.
    pub fn scenarios(&self) -> Vec<Scenario> {
        distinct(self.tables.volumes.iter().map(|v| v.scenario.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
