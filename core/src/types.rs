//! Shared primitive types used across the reporting core.

/// Key of a row in the customer dimension.
pub type CustomerId = String;

/// Key of a row in the price dimension.
pub type Sku = String;

/// Key of a row in the category dimension.
pub type CategoryId = String;

/// A planning variant of the volume data. Open set: any label is valid.
pub type Scenario = String;

pub const BASE_SCENARIO: &str = "Base";
pub const REVISED_SCENARIO: &str = "Revised";

/// Tolerance used when checking that a bridge closes.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;
