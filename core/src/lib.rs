//! Reporting core for the volume reallocation dashboard.
//!
//! Four flat tables (customers, prices, categories, volumes by scenario)
//! are loaded once into an immutable `DatasetStore`. The `ReportEngine`
//! turns them into the dashboard views: trends, bridges and revenue /
//! margin impact.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod impact;
pub mod source;
pub mod store;
pub mod table;
pub mod trend;
pub mod types;

pub use bridge::{AnchorMode, Bridge, BridgeRow, Waterfall};
pub use config::{ReportConfig, ScenarioPair, SchemaConfig};
pub use engine::ReportEngine;
pub use error::{ReportError, ReportResult};
pub use store::DatasetStore;
pub use table::{Cell, RawTable};
