//! Wire and domain types for the analysis pipeline.
//!
//! `OverallRow` and `TransactionLine` model the two raw tables a request
//! supplies; `VirtualTransaction` is the derived per-transaction view the
//! builder produces; `MetricResult` is the uniform shape every calculator
//! returns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of the per-variation aggregate table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverallRow {
    pub variation: String,
    pub users: f64,
    pub user_add_to_carts: f64,
}

/// One raw transaction line item, pre-normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionLine {
    pub transaction_id: String,
    pub variation: String,
    #[serde(default = "na")]
    pub device_category: String,
    #[serde(default = "na")]
    pub item_category2: String,
    #[serde(default = "na")]
    pub item_name: String,
    #[serde(default = "na")]
    pub item_bundle: String,
    #[serde(default = "na")]
    pub item_name_simple: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub revenue: f64,
}

fn na() -> String {
    "N/A".to_string()
}

/// One row of the derived virtual table: one per `transaction_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VirtualTransaction {
    pub transaction_id: String,
    pub variation: String,
    pub device_category: String,
    pub revenue: f64,
    pub quantity: f64,
    pub item_category2: String,
    pub item_name: String,
    pub item_bundle: String,
    pub item_name_simple: String,
}

/// The unit a `MetricDetail.rate` is expressed in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Percentage,
    Currency,
    Quantity,
}

/// Per-side breakdown carried alongside a `MetricResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDetail {
    pub count: i64,
    pub total: f64,
    pub rate: f64,
    pub unit: Unit,
}

/// A closed interval `[lower, upper]` on a relative percent difference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            lower: 0.0,
            upper: 0.0,
        }
    }
}

/// The uniform result shape every metric calculator returns.
///
/// `Users` omits `confidence`/`confidence_interval` semantically (the
/// original never computes a test for it); this is represented by leaving
/// both at their zero defaults rather than making the fields optional,
/// since the wire shape in the specification is unconditional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricResult {
    pub value: f64,
    pub control_value: f64,
    pub uplift: f64,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub details: MetricDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricDetails {
    pub variation: MetricDetail,
    pub control: MetricDetail,
}

impl MetricResult {
    /// The zeroed result a degraded (failed) calculator falls back to.
    #[must_use]
    pub fn zeroed(unit: Unit) -> Self {
        let detail = MetricDetail {
            count: 0,
            total: 0.0,
            rate: 0.0,
            unit,
        };
        Self {
            value: 0.0,
            control_value: 0.0,
            uplift: 0.0,
            confidence: 0.0,
            confidence_interval: ConfidenceInterval::zero(),
            details: MetricDetails {
                variation: detail.clone(),
                control: detail,
            },
        }
    }
}

/// Named-metric map for a single variation, insertion-ordered.
pub type MetricMap = IndexMap<String, MetricResult>;

/// Per-variation map of metric maps, insertion-ordered to match the
/// iteration order of `overall` (the ordering guarantee in the
/// specification's concurrency section).
pub type VariationMap = IndexMap<String, MetricMap>;

/// Top-level response for `/calculate-overview` and `/calculate-revenue`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: VariationMap,
    pub control: String,
    pub virtual_table: Vec<VirtualTransaction>,
}
