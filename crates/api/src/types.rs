//! Request/response envelopes for the HTTP surface, matching §6's wire shapes.

use abtest_ingest::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_filters() -> Filters {
    Filters::default()
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Filters {
    #[serde(default)]
    pub device_category: Vec<String>,
    #[serde(default)]
    pub item_category2: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub overall_data: Vec<RawRecord>,
    #[serde(default)]
    pub transaction_data: Vec<RawRecord>,
    pub currency: Option<String>,
    #[serde(default = "default_filters")]
    pub filters: Filters,
}

#[derive(Debug, Serialize)]
pub struct RawDataEnvelope {
    pub overall: Vec<RawRecord>,
    pub transaction: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeSummary {
    pub overall_rows: usize,
    pub transaction_rows: usize,
    pub columns_overall: Vec<String>,
    pub columns_transaction: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub raw_data: RawDataEnvelope,
    pub summary: AnalyzeSummary,
}

#[derive(Debug, Deserialize)]
pub struct OverviewRequest {
    pub overall: Vec<RawRecord>,
    #[serde(default)]
    pub transaction: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RawDataRequest {
    pub raw_data: RawDataBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDataBody {
    #[serde(default)]
    pub overall: Vec<RawRecord>,
    #[serde(default)]
    pub transaction: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
pub struct AggregateMeta {
    pub input_records: usize,
    pub output_records: usize,
}

#[derive(Debug, Serialize)]
pub struct CreateAnalysisMetadata {
    pub columns: Vec<String>,
    pub metrics: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
