//! Revenue and gross-margin impact of the reallocation, per client.

use crate::types::CustomerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientImpact {
    pub customer_id: CustomerId,
    pub client: String,
    pub revenue_base: f64,
    pub revenue_revised: f64,
    pub margin_base: f64,
    pub margin_revised: f64,
    pub revenue_impact: f64,
    pub margin_impact: f64,
}

impl ClientImpact {
    pub fn new(
        customer_id: CustomerId,
        client: String,
        revenue_base: f64,
        revenue_revised: f64,
        margin_base: f64,
        margin_revised: f64,
    ) -> Self {
        Self {
            customer_id,
            client,
            revenue_base,
            revenue_revised,
            margin_base,
            margin_revised,
            revenue_impact: revenue_revised - revenue_base,
            margin_impact: margin_revised - margin_base,
        }
    }
}

/// One bar of a labelled bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub label: String,
    pub value: f64,
}

pub fn revenue_impact_bars(impacts: &[ClientImpact]) -> Vec<BarPoint> {
    impacts
        .iter()
        .map(|i| BarPoint {
            label: i.client.clone(),
            value: i.revenue_impact,
        })
        .collect()
}

pub fn margin_impact_bars(impacts: &[ClientImpact]) -> Vec<BarPoint> {
    impacts
        .iter()
        .map(|i| BarPoint {
            label: i.client.clone(),
            value: i.margin_impact,
        })
        .collect()
}
