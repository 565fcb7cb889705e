//! Untyped tables as handed over by a data source.
//!
//! A `RawTable` is the boundary between whatever produced the data
//! (SQLite, CSV, a test fixture) and the typed records in the store.
//! Column presence is checked here; cell coercion is lenient and
//! returns `None` for anything that does not fit.

use crate::error::{ReportError, ReportResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cell of a raw table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Int(i64),
    Real(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Real(v) => v.is_nan(),
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Int(_) => false,
        }
    }

    /// Render as a join key. Integral reals lose their fractional part so
    /// that an id read as `7.0` still matches `7`.
    pub fn as_key(&self) -> Option<String> {
        match self {
            _ if self.is_null() => None,
            Cell::Int(v) => Some(v.to_string()),
            Cell::Real(v) if v.fract() == 0.0 && v.abs() < 1e15 => Some((*v as i64).to_string()),
            Cell::Real(v) => Some(v.to_string()),
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Null => None,
        }
    }

    /// Render as a display label.
    pub fn as_text(&self) -> Option<String> {
        match self {
            _ if self.is_null() => None,
            Cell::Text(s) => Some(s.clone()),
            other => other.as_key(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(*v as f64),
            Cell::Real(v) if v.is_finite() => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Parse a calendar date. Accepts `YYYY-MM-DD` optionally followed by a
    /// time part (`' '` or `'T'` separated), which is discarded.
    pub fn as_date(&self) -> Option<NaiveDate> {
        let Cell::Text(s) = self else {
            return None;
        };
        let s = s.trim();
        let day = match s.find([' ', 'T']) {
            Some(i) => &s[..i],
            None => s,
        };
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Real(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Text(value.format("%Y-%m-%d").to_string())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

static NULL_CELL: Cell = Cell::Null;

/// Cell at `index`, or null when the row is too short.
pub fn cell(row: &[Cell], index: usize) -> &Cell {
    row.get(index).unwrap_or(&NULL_CELL)
}

/// A named table of cells with a header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn with_row(mut self, row: Vec<Cell>) -> Self {
        self.push_row(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a required column, or a schema error naming it.
    pub fn require_column(&self, column: &str) -> ReportResult<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| ReportError::Schema {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}
