//! Grouped conditional sums over the fact table.
//!
//! A query is the explicit form of
//! `SELECT key, SUM(CASE WHEN scenario = ? THEN measure ELSE 0 END), ...
//!  FROM facts JOIN ... GROUP BY key`.
//! Dimension joins are hash lookups; a fact row that misses any join the
//! query needs is skipped, which is exactly inner-join semantics.

use super::{DatasetStore, Price, VolumeFact};
use crate::{
    error::{ReportError, ReportResult},
    types::{CategoryId, CustomerId, Scenario},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What is summed for each fact row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Measure {
    /// Raw volume (kg).
    Volume,
    /// `volume * revenue_per_kg`.
    Revenue,
    /// `volume * margin_per_kg`.
    Margin,
}

impl Measure {
    fn needs_price(self) -> bool {
        !matches!(self, Measure::Volume)
    }

    fn value(self, fact: &VolumeFact, price: Option<&Price>) -> f64 {
        match (self, price) {
            (Measure::Volume, _) => fact.volume,
            (Measure::Revenue, Some(p)) => fact.volume * p.revenue_per_kg,
            (Measure::Margin, Some(p)) => fact.volume * p.margin_per_kg,
            (_, None) => 0.0,
        }
    }
}

/// One output column: a measure, optionally restricted to one scenario.
/// Rows of other scenarios contribute 0 to a restricted column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SumColumn {
    pub measure: Measure,
    pub scenario: Option<Scenario>,
}

impl SumColumn {
    pub fn total(measure: Measure) -> Self {
        Self {
            measure,
            scenario: None,
        }
    }

    pub fn when(measure: Measure, scenario: impl Into<Scenario>) -> Self {
        Self {
            measure,
            scenario: Some(scenario.into()),
        }
    }

    fn applies_to(&self, fact: &VolumeFact) -> bool {
        self.scenario.as_ref().map_or(true, |s| *s == fact.scenario)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    DateScenario,
    Client,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Keep only facts whose customer carries this display name.
    pub client: Option<String>,
    pub group_by: GroupBy,
    pub columns: Vec<SumColumn>,
}

impl Query {
    pub fn group_by(group_by: GroupBy) -> Self {
        Self {
            client: None,
            group_by,
            columns: Vec::new(),
        }
    }

    pub fn for_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    pub fn sum(mut self, column: SumColumn) -> Self {
        self.columns.push(column);
        self
    }

    fn needs_customer(&self) -> bool {
        self.client.is_some() || self.group_by == GroupBy::Client
    }

    fn needs_price(&self) -> bool {
        self.columns.iter().any(|c| c.measure.needs_price())
    }

    fn needs_category(&self) -> bool {
        self.group_by == GroupBy::Category
    }
}

/// Grouping key of a result row. Dimension groups are keyed by the
/// dimension's unique id, so two customers sharing a name stay apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupKey {
    DateScenario {
        date: NaiveDate,
        scenario: Scenario,
    },
    Client {
        customer_id: CustomerId,
        client_name: String,
    },
    Category {
        category_id: CategoryId,
        category_name: String,
    },
}

impl GroupKey {
    /// Display label of the group.
    pub fn label(&self) -> String {
        match self {
            GroupKey::DateScenario { date, scenario } => format!("{date} {scenario}"),
            GroupKey::Client { client_name, .. } => client_name.clone(),
            GroupKey::Category { category_name, .. } => category_name.clone(),
        }
    }

    /// Unique id of the group.
    pub fn id(&self) -> String {
        match self {
            GroupKey::DateScenario { date, scenario } => format!("{date}/{scenario}"),
            GroupKey::Client { customer_id, .. } => customer_id.clone(),
            GroupKey::Category { category_id, .. } => category_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub key: GroupKey,
    /// One sum per query column, in column order.
    pub sums: Vec<f64>,
}

impl DatasetStore {
    /// Run a grouped-sum query. Rows come back ordered by group key.
    pub fn query(&self, query: &Query) -> ReportResult<Vec<QueryRow>> {
        let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
        let mut skipped = 0usize;

        for fact in self.volumes() {
            let customer = if query.needs_customer() {
                match self.customer(&fact.customer_id) {
                    Some(c) => Some(c),
                    None => {
                        skipped += 1;
                        continue;
                    }
                }
            } else {
                None
            };
            if let (Some(client), Some(c)) = (&query.client, customer) {
                if c.client_name != *client {
                    continue;
                }
            }

            let price = if query.needs_price() {
                match self.price(&fact.sku) {
                    Some(p) => Some(p),
                    None => {
                        skipped += 1;
                        continue;
                    }
                }
            } else {
                None
            };

            let category = if query.needs_category() {
                match self.category(&fact.category_id) {
                    Some(c) => Some(c),
                    None => {
                        skipped += 1;
                        continue;
                    }
                }
            } else {
                None
            };

            let key = match (query.group_by, customer, category) {
                (GroupBy::DateScenario, _, _) => GroupKey::DateScenario {
                    date: fact.date,
                    scenario: fact.scenario.clone(),
                },
                (GroupBy::Client, Some(c), _) => GroupKey::Client {
                    customer_id: c.customer_id.clone(),
                    client_name: c.client_name.clone(),
                },
                (GroupBy::Category, _, Some(c)) => GroupKey::Category {
                    category_id: c.category_id.clone(),
                    category_name: c.category_name.clone(),
                },
                _ => continue,
            };

            let sums = groups
                .entry(key)
                .or_insert_with(|| vec![0.0; query.columns.len()]);
            for (sum, column) in sums.iter_mut().zip(&query.columns) {
                if column.applies_to(fact) {
                    *sum += column.measure.value(fact, price);
                }
            }
        }

        if skipped > 0 {
            log::debug!("query {:?}: {skipped} fact row(s) failed to join", query.group_by);
        }

        let rows: Vec<QueryRow> = groups
            .into_iter()
            .map(|(key, sums)| QueryRow { key, sums })
            .collect();

        if let Some(row) = rows
            .iter()
            .find(|r| r.sums.iter().any(|s| !s.is_finite()))
        {
            return Err(ReportError::NumericOverflow {
                context: format!("{:?} sums for '{}'", query.group_by, row.key.label()),
            });
        }

        Ok(rows)
    }
}
