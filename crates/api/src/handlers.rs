//! Route handlers. Each logs request shape at `info`/`debug` and
//! unexpected failures at `error`, matching the original service's logger
//! placement at every endpoint boundary.

use crate::error::ApiError;
use crate::types::{
    AggregateMeta, AnalyzeRequest, AnalyzeResponse, AnalyzeSummary, CreateAnalysisMetadata, HealthResponse,
    OverviewRequest, RawDataEnvelope, RawDataRequest,
};
use abtest_analytics::{run_analysis, MetricProfile};
use abtest_core::{AnalysisResponse, AppError, BootstrapConfig};
use abtest_ingest::{
    build_aggregated_transactions, build_virtual_table, clean_records, parse_overall_rows, parse_transaction_lines,
    validate_transaction_lines, AggregatedTransaction, RawRecord, ValidationReport,
};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn columns_of(records: &[RawRecord]) -> Vec<String> {
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// `POST /analyze`: cleans both tables and returns the normalized envelope
/// plus a row/column summary. `overall_data` is required.
pub async fn analyze(Json(req): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>, ApiError> {
    tracing::info!(
        overall_rows = req.overall_data.len(),
        transaction_rows = req.transaction_data.len(),
        "received analyze request"
    );

    if req.overall_data.is_empty() {
        return Err(ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, AppError::input_missing("overall_data")));
    }

    let overall = clean_records(req.overall_data);
    let transaction = clean_records(req.transaction_data);

    let summary = AnalyzeSummary {
        overall_rows: overall.len(),
        transaction_rows: transaction.len(),
        columns_overall: columns_of(&overall),
        columns_transaction: columns_of(&transaction),
    };

    Ok(Json(AnalyzeResponse {
        raw_data: RawDataEnvelope { overall, transaction },
        summary,
    }))
}

/// `POST /aggregate-transactions`: requires `transaction_id` and
/// `item_category2` on the first record.
pub async fn aggregate_transactions(Json(records): Json<Vec<RawRecord>>) -> Result<Json<Value>, ApiError> {
    tracing::info!(input_records = records.len(), "received aggregate-transactions request");

    let first = records
        .first()
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, AppError::input_missing("no data provided for aggregation")))?;

    if !first.contains_key("transaction_id") || !first.contains_key("item_category2") {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            AppError::input_malformed("missing required fields: transaction_id, item_category2"),
        ));
    }

    let input_records = records.len();
    let cleaned = clean_records(records);
    let lines = parse_transaction_lines(&cleaned);
    let aggregated: Vec<AggregatedTransaction> = build_aggregated_transactions(&lines);

    tracing::info!(output_records = aggregated.len(), "aggregation succeeded");

    Ok(Json(json!({
        "success": true,
        "data": aggregated,
        "meta": AggregateMeta { input_records, output_records: aggregated.len() },
    })))
}

/// `POST /calculate-overview`: `{users, add_to_cart_rate, transaction_rate, total_revenue}` per variation.
pub async fn calculate_overview(
    State(bootstrap): State<Arc<BootstrapConfig>>,
    Json(req): Json<OverviewRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    tracing::info!(overall_rows = req.overall.len(), transaction_rows = req.transaction.len(), "received calculate-overview request");

    if req.overall.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, AppError::input_missing("overall data is required")));
    }

    let overall = parse_overall_rows(&clean_records(req.overall));
    let transaction = parse_transaction_lines(&clean_records(req.transaction));
    let virtual_table = build_virtual_table(&transaction);

    let response = run_analysis(&overall, &virtual_table, MetricProfile::Overview, &bootstrap)?;
    Ok(Json(response))
}

/// `POST /calculate-revenue`: `{users, transaction_rate, aov, avg_products, total_revenue, arpu}` per variation.
/// Missing transaction data is a 500, matching the original's loose validation.
pub async fn calculate_revenue(
    State(bootstrap): State<Arc<BootstrapConfig>>,
    Json(req): Json<RawDataRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    tracing::info!(
        overall_rows = req.raw_data.overall.len(),
        transaction_rows = req.raw_data.transaction.len(),
        "received calculate-revenue request"
    );

    if req.raw_data.transaction.is_empty() {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            AppError::input_missing("missing transaction or overall data"),
        ));
    }

    let overall = parse_overall_rows(&clean_records(req.raw_data.overall));
    let transaction = parse_transaction_lines(&clean_records(req.raw_data.transaction));
    let virtual_table = build_virtual_table(&transaction);

    let response = run_analysis(&overall, &virtual_table, MetricProfile::Revenue, &bootstrap)
        .map_err(|err| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err))?;
    Ok(Json(response))
}

/// `POST /validate-data`: non-blocking sanity checks, never fails on valid JSON input.
pub async fn validate_data(Json(records): Json<Vec<RawRecord>>) -> Json<ValidationReport> {
    let cleaned = clean_records(records);
    let lines = parse_transaction_lines(&cleaned);
    Json(validate_transaction_lines(&lines))
}

/// `POST /create-analysis`: the full-precision virtual table plus a metric-name glossary.
/// Both `overall` and `transaction` are required.
pub async fn create_analysis(Json(req): Json<RawDataRequest>) -> Result<Json<Value>, ApiError> {
    if req.raw_data.overall.is_empty() || req.raw_data.transaction.is_empty() {
        return Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            AppError::input_missing("missing transaction or overall data"),
        ));
    }

    let transaction = parse_transaction_lines(&clean_records(req.raw_data.transaction));
    let virtual_table = build_virtual_table(&transaction);

    let columns = vec![
        "transaction_id".to_string(),
        "revenue".to_string(),
        "quantity".to_string(),
        "variation".to_string(),
        "device_category".to_string(),
        "item_category2".to_string(),
        "item_name".to_string(),
        "item_bundle".to_string(),
        "item_name_simple".to_string(),
    ];

    let metrics: HashMap<String, String> = HashMap::from([
        ("add_to_cart_rate".to_string(), "Percentage of users who added a product to cart".to_string()),
        ("transaction_rate".to_string(), "Percentage of users who made a purchase".to_string()),
        ("aov".to_string(), "Average Order Value".to_string()),
        ("arpu".to_string(), "Average Revenue Per User".to_string()),
        ("avg_products".to_string(), "Average number of items per order".to_string()),
    ]);

    Ok(Json(json!({
        "success": true,
        "data": virtual_table,
        "metadata": CreateAnalysisMetadata { columns, metrics },
    })))
}
