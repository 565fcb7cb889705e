//! Bridges (base → revised walks) and their waterfall rendering.
//!
//! A bridge holds one row per segment (client or category) with the base
//! and revised totals and their difference. The waterfall is the chart
//! shape built from it: a starting bar, one relative bar per segment and
//! a closing total bar.

use crate::config::ScenarioPair;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeRow {
    /// Unique key of the segment (customer id or category id).
    pub id: String,
    pub label: String,
    pub base_total: f64,
    pub revised_total: f64,
    /// `revised_total - base_total`.
    pub impact: f64,
}

impl BridgeRow {
    pub fn new(id: String, label: String, base_total: f64, revised_total: f64) -> Self {
        Self {
            id,
            label,
            base_total,
            revised_total,
            impact: revised_total - base_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub scenarios: ScenarioPair,
    pub rows: Vec<BridgeRow>,
    pub base_total: f64,
    pub revised_total: f64,
}

impl Bridge {
    pub fn new(scenarios: ScenarioPair, rows: Vec<BridgeRow>) -> Self {
        let base_total = rows.iter().map(|r| r.base_total).sum();
        let revised_total = rows.iter().map(|r| r.revised_total).sum();
        Self {
            scenarios,
            rows,
            base_total,
            revised_total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the per-segment impacts.
    pub fn total_impact(&self) -> f64 {
        self.rows.iter().map(|r| r.impact).sum()
    }

    /// Whether the impacts add up to revised minus base.
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        (self.total_impact() - (self.revised_total - self.base_total)).abs() <= tolerance
    }

    /// Lay the bridge out as a waterfall.
    ///
    /// `Relative` starts from zero and closes on the sum of impacts;
    /// `Absolute` starts from the base total and closes on the revised total.
    pub fn waterfall(
        &self,
        mode: AnchorMode,
        title: impl Into<String>,
        start_label: impl Into<String>,
        end_label: impl Into<String>,
    ) -> Waterfall {
        let (start, end) = match mode {
            AnchorMode::Relative => (0.0, self.total_impact()),
            AnchorMode::Absolute => (self.base_total, self.revised_total),
        };

        let mut bars = Vec::with_capacity(self.rows.len() + 2);
        bars.push(WaterfallBar::new(start_label, start, BarMeasure::Absolute));
        bars.extend(
            self.rows
                .iter()
                .map(|r| WaterfallBar::new(r.label.clone(), r.impact, BarMeasure::Relative)),
        );
        bars.push(WaterfallBar::new(end_label, end, BarMeasure::Total));

        Waterfall {
            title: title.into(),
            mode,
            bars,
        }
    }
}

/// How the first and last bars of a waterfall are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    Relative,
    Absolute,
}

impl std::str::FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative" => Ok(AnchorMode::Relative),
            "absolute" => Ok(AnchorMode::Absolute),
            other => Err(format!("unknown anchor mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMeasure {
    /// Sets the running level.
    Absolute,
    /// Moves the running level by its value.
    Relative,
    /// Displays the closing level.
    Total,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallBar {
    pub label: String,
    pub value: f64,
    pub measure: BarMeasure,
}

impl WaterfallBar {
    pub fn new(label: impl Into<String>, value: f64, measure: BarMeasure) -> Self {
        Self {
            label: label.into(),
            value,
            measure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waterfall {
    pub title: String,
    pub mode: AnchorMode,
    pub bars: Vec<WaterfallBar>,
}

impl Waterfall {
    /// Running level after walking every absolute and relative bar.
    pub fn end_value(&self) -> f64 {
        self.bars.iter().fold(0.0, |level, bar| match bar.measure {
            BarMeasure::Absolute => bar.value,
            BarMeasure::Relative => level + bar.value,
            BarMeasure::Total => level,
        })
    }

    /// Value of the closing total bar, if any.
    pub fn total(&self) -> Option<f64> {
        self.bars
            .iter()
            .rev()
            .find(|b| b.measure == BarMeasure::Total)
            .map(|b| b.value)
    }
}
