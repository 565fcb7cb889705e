use crate::types::{BASE_SCENARIO, DEFAULT_TOLERANCE, REVISED_SCENARIO};
use serde::{Deserialize, Serialize};

// ── Schema ─────────────────────────────────────────────────────────

/// Column layout of the customer dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerColumns {
    pub table: String,
    pub customer_id: String,
    pub client_name: String,
}

impl Default for CustomerColumns {
    fn default() -> Self {
        Self {
            table: "DimCustomer".into(),
            customer_id: "ID_Client".into(),
            client_name: "Client".into(),
        }
    }
}

/// Column layout of the price dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceColumns {
    pub table: String,
    pub sku: String,
    pub revenue_per_kg: String,
    pub margin_per_kg: String,
}

impl Default for PriceColumns {
    fn default() -> Self {
        Self {
            table: "DimPrice".into(),
            sku: "SKU".into(),
            revenue_per_kg: "NOS/KG".into(),
            margin_per_kg: "GP/KG".into(),
        }
    }
}

/// Column layout of the category dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryColumns {
    pub table: String,
    pub category_id: String,
    pub category_name: String,
}

impl Default for CategoryColumns {
    fn default() -> Self {
        Self {
            table: "DimCateg".into(),
            category_id: "ID".into(),
            category_name: "Categorie".into(),
        }
    }
}

/// Column layout of the volume fact table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeColumns {
    pub table: String,
    pub date: String,
    pub scenario: String,
    pub customer_id: String,
    pub sku: String,
    pub category_id: String,
    pub volume: String,
}

impl Default for VolumeColumns {
    fn default() -> Self {
        Self {
            table: "FactVolumes".into(),
            date: "Date".into(),
            scenario: "Scenario".into(),
            customer_id: "ID_CUSTO".into(),
            sku: "SKU".into(),
            category_id: "ID_CATEG".into(),
            volume: "Volume".into(),
        }
    }
}

/// Where each required field lives in the raw input tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub customers: CustomerColumns,
    pub prices: PriceColumns,
    pub categories: CategoryColumns,
    pub volumes: VolumeColumns,
}

// ── Reports ────────────────────────────────────────────────────────

/// The two scenarios a bridge compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioPair {
    pub base: String,
    pub revised: String,
}

impl Default for ScenarioPair {
    fn default() -> Self {
        Self {
            base: BASE_SCENARIO.into(),
            revised: REVISED_SCENARIO.into(),
        }
    }
}

impl ScenarioPair {
    pub fn new(base: impl Into<String>, revised: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            revised: revised.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub schema: SchemaConfig,
    pub scenarios: ScenarioPair,
    /// Prefix of the waterfall anchor labels ("Forecast Base" ...).
    pub anchor_prefix: String,
    /// Reject queries on client names absent from the customer table
    /// instead of returning an empty result.
    pub strict_clients: bool,
    /// Allowed gap between the sum of impacts and revised minus base.
    pub tolerance: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema: SchemaConfig::default(),
            scenarios: ScenarioPair::default(),
            anchor_prefix: "Forecast".into(),
            strict_clients: false,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ReportConfig {
    /// Load from a JSON file. Missing fields fall back to their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ReportConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Waterfall label for a scenario total, e.g. "Forecast Revised".
    pub fn anchor_label(&self, scenario: &str) -> String {
        if self.anchor_prefix.is_empty() {
            scenario.to_string()
        } else {
            format!("{} {scenario}", self.anchor_prefix)
        }
    }
}
