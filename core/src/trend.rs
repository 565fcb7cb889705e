//! Trend views: totals per (date, scenario) for one client.

use crate::types::Scenario;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub scenario: Scenario,
    pub total: f64,
}

/// Split trend points into one dated line per scenario, the shape a line
/// chart coloured by scenario consumes. Points keep their date order.
pub fn series_by_scenario(points: &[TrendPoint]) -> BTreeMap<Scenario, Vec<(NaiveDate, f64)>> {
    let mut series: BTreeMap<Scenario, Vec<(NaiveDate, f64)>> = BTreeMap::new();
    for p in points {
        series
            .entry(p.scenario.clone())
            .or_default()
            .push((p.date, p.total));
    }
    series
}

/// Sum of all points, optionally restricted to one scenario.
pub fn trend_total(points: &[TrendPoint], scenario: Option<&str>) -> f64 {
    points
        .iter()
        .filter(|p| scenario.map_or(true, |s| p.scenario == s))
        .map(|p| p.total)
        .sum()
}
