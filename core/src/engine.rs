//! The report engine: every dashboard view is computed here.
//!
//! VIEWS:
//!   1. Volume / revenue / margin trend for one client
//!   2. Client bridge          (base → revised, one bar per client)
//!   3. Category bridge        (base → revised, one bar per category)
//!   4. Detailed bridge        (one client, one bar per category, any scenario pair)
//!   5. Revenue & margin impact per client
//!
//! RULES:
//!   - Views are pure reads of the store; the store is never mutated.
//!   - Fact rows that fail a join are left out of that view, never an error.
//!   - A scenario with no rows sums to 0, so impacts always exist.
//!   - Unknown client names give empty views unless `strict_clients` is set.

use crate::{
    bridge::{AnchorMode, Bridge, BridgeRow, Waterfall},
    config::{ReportConfig, ScenarioPair},
    error::{ReportError, ReportResult},
    impact::ClientImpact,
    store::{DatasetStore, GroupBy, GroupKey, Measure, Query, QueryRow, SumColumn},
    trend::TrendPoint,
};

pub struct ReportEngine<'a> {
    store: &'a DatasetStore,
    config: &'a ReportConfig,
}

impl<'a> ReportEngine<'a> {
    pub fn new(store: &'a DatasetStore, config: &'a ReportConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &DatasetStore {
        self.store
    }

    pub fn config(&self) -> &ReportConfig {
        self.config
    }

    // ── Trends ─────────────────────────────────────────────────────

    /// Volume per (date, scenario) for every customer named `client`.
    pub fn volume_trend(&self, client: &str) -> ReportResult<Vec<TrendPoint>> {
        self.trend(client, Measure::Volume)
    }

    /// Revenue per (date, scenario). Unpriced SKUs are left out.
    pub fn revenue_trend(&self, client: &str) -> ReportResult<Vec<TrendPoint>> {
        self.trend(client, Measure::Revenue)
    }

    /// Gross margin per (date, scenario). Unpriced SKUs are left out.
    pub fn margin_trend(&self, client: &str) -> ReportResult<Vec<TrendPoint>> {
        self.trend(client, Measure::Margin)
    }

    pub fn trend(&self, client: &str, measure: Measure) -> ReportResult<Vec<TrendPoint>> {
        self.check_client(client)?;

        let query = Query::group_by(GroupBy::DateScenario)
            .for_client(client)
            .sum(SumColumn::total(measure));
        let points: Vec<TrendPoint> = self
            .store
            .query(&query)?
            .into_iter()
            .filter_map(|row| match row.key {
                GroupKey::DateScenario { date, scenario } => Some(TrendPoint {
                    date,
                    scenario,
                    total: row.sums[0],
                }),
                _ => None,
            })
            .collect();

        log::debug!("{measure:?} trend for '{client}': {} point(s)", points.len());
        Ok(points)
    }

    // ── Bridges ────────────────────────────────────────────────────

    /// Volume bridge per client over the configured scenario pair.
    pub fn client_bridge(&self) -> ReportResult<Bridge> {
        let query = self.bridge_query(GroupBy::Client, &self.config.scenarios);
        self.bridge(&query, &self.config.scenarios, "client")
    }

    /// Client bridge as a waterfall, in either anchor mode.
    pub fn client_waterfall(&self, mode: AnchorMode) -> ReportResult<Waterfall> {
        let bridge = self.client_bridge()?;
        let title = match mode {
            AnchorMode::Relative => "Bridge Analysis by Client (relative impacts)".to_string(),
            AnchorMode::Absolute => "Bridge Analysis by Client".to_string(),
        };
        Ok(self.waterfall(&bridge, mode, title))
    }

    /// Volume bridge per category over the configured scenario pair.
    pub fn category_bridge(&self) -> ReportResult<Bridge> {
        let query = self.bridge_query(GroupBy::Category, &self.config.scenarios);
        self.bridge(&query, &self.config.scenarios, "category")
    }

    /// Category bridge as a waterfall. Always anchored on absolute totals.
    pub fn category_waterfall(&self) -> ReportResult<Waterfall> {
        let bridge = self.category_bridge()?;
        let s = &self.config.scenarios;
        let title = format!("Bridge Analysis by Category: {} → {}", s.base, s.revised);
        Ok(self.waterfall(&bridge, AnchorMode::Absolute, title))
    }

    /// Volume bridge per category for one client, over any scenario pair.
    pub fn detailed_bridge(
        &self,
        client: &str,
        base_scenario: &str,
        revised_scenario: &str,
    ) -> ReportResult<Bridge> {
        self.check_client(client)?;

        let scenarios = ScenarioPair::new(base_scenario, revised_scenario);
        let query = self
            .bridge_query(GroupBy::Category, &scenarios)
            .for_client(client);
        self.bridge(&query, &scenarios, client)
    }

    /// Detailed bridge over the configured scenario pair.
    pub fn detailed_bridge_default(&self, client: &str) -> ReportResult<Bridge> {
        let s = &self.config.scenarios;
        self.detailed_bridge(client, &s.base, &s.revised)
    }

    /// Detailed bridge as a waterfall anchored on the client's totals.
    pub fn detailed_waterfall(
        &self,
        client: &str,
        base_scenario: &str,
        revised_scenario: &str,
    ) -> ReportResult<Waterfall> {
        let bridge = self.detailed_bridge(client, base_scenario, revised_scenario)?;
        let title = format!("Bridge Analysis for {client}: {base_scenario} → {revised_scenario}");
        Ok(self.waterfall(&bridge, AnchorMode::Absolute, title))
    }

    // ── Impact ─────────────────────────────────────────────────────

    /// Revenue and margin under both scenarios, per client, ordered by
    /// customer id.
    pub fn impact_by_client(&self) -> ReportResult<Vec<ClientImpact>> {
        let s = &self.config.scenarios;
        let query = Query::group_by(GroupBy::Client)
            .sum(SumColumn::when(Measure::Revenue, s.base.as_str()))
            .sum(SumColumn::when(Measure::Revenue, s.revised.as_str()))
            .sum(SumColumn::when(Measure::Margin, s.base.as_str()))
            .sum(SumColumn::when(Measure::Margin, s.revised.as_str()));

        let impacts: Vec<ClientImpact> = self
            .store
            .query(&query)?
            .into_iter()
            .filter_map(|row| match row.key {
                GroupKey::Client {
                    customer_id,
                    client_name,
                } => Some(ClientImpact::new(
                    customer_id,
                    client_name,
                    row.sums[0],
                    row.sums[1],
                    row.sums[2],
                    row.sums[3],
                )),
                _ => None,
            })
            .collect();

        if let Some(bad) = impacts
            .iter()
            .find(|i| !i.revenue_impact.is_finite() || !i.margin_impact.is_finite())
        {
            return Err(ReportError::NumericOverflow {
                context: format!("impact for '{}'", bad.client),
            });
        }

        log::debug!("impact by client: {} row(s)", impacts.len());
        Ok(impacts)
    }

    // ── Helpers ────────────────────────────────────────────────────

    fn check_client(&self, client: &str) -> ReportResult<()> {
        if self.config.strict_clients && !self.store.has_client(client) {
            return Err(ReportError::UnknownClient {
                client: client.to_string(),
            });
        }
        Ok(())
    }

    fn bridge_query(&self, group_by: GroupBy, scenarios: &ScenarioPair) -> Query {
        Query::group_by(group_by)
            .sum(SumColumn::when(Measure::Volume, scenarios.base.as_str()))
            .sum(SumColumn::when(Measure::Volume, scenarios.revised.as_str()))
    }

    fn bridge(&self, query: &Query, scenarios: &ScenarioPair, what: &str) -> ReportResult<Bridge> {
        let rows: Vec<BridgeRow> = self
            .store
            .query(query)?
            .into_iter()
            .map(|QueryRow { key, sums }| BridgeRow::new(key.id(), key.label(), sums[0], sums[1]))
            .collect();
        let bridge = Bridge::new(scenarios.clone(), rows);

        if !bridge.base_total.is_finite() || !bridge.revised_total.is_finite() {
            return Err(ReportError::NumericOverflow {
                context: format!("{what} bridge totals"),
            });
        }
        if let Some(row) = bridge.rows.iter().find(|r| !r.impact.is_finite()) {
            return Err(ReportError::NumericOverflow {
                context: format!("{what} bridge impact for '{}'", row.label),
            });
        }
        if !bridge.total_impact().is_finite() {
            return Err(ReportError::NumericOverflow {
                context: format!("{what} bridge total impact"),
            });
        }
        if !bridge.is_balanced(self.config.tolerance) {
            log::warn!(
                "{what} bridge does not close: impacts {} vs {}",
                bridge.total_impact(),
                bridge.revised_total - bridge.base_total
            );
        }

        log::debug!("{what} bridge: {} segment(s)", bridge.rows.len());
        Ok(bridge)
    }

    fn waterfall(&self, bridge: &Bridge, mode: AnchorMode, title: String) -> Waterfall {
        bridge.waterfall(
            mode,
            title,
            self.config.anchor_label(&bridge.scenarios.base),
            self.config.anchor_label(&bridge.scenarios.revised),
        )
    }
}
