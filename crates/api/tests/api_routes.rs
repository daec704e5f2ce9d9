use abtest_core::BootstrapConfig;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn router() -> axum::Router {
    abtest_api::ApiServer::new(BootstrapConfig { iterations: 100, confidence_level: 0.95, seed: Some(7) }).router()
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, parsed)
}

#[tokio::test]
async fn health_check_returns_200_and_status_healthy() {
    let request = Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap();
    let response = router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn analyze_rejects_missing_overall_data_with_422() {
    let (status, body) = post("/analyze", json!({ "overall_data": [] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn aggregate_transactions_rejects_empty_array_with_400() {
    let (status, body) = post("/aggregate-transactions", json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn aggregate_transactions_rejects_missing_required_fields_with_400() {
    let (status, _) = post("/aggregate-transactions", json!([{ "revenue": 10.0 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn calculate_overview_rejects_missing_overall_with_400() {
    let (status, _) = post("/calculate-overview", json!({ "overall": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn calculate_revenue_rejects_missing_transaction_with_500() {
    let body = json!({ "raw_data": { "overall": [{ "variation": "Control", "users": 10, "user_add_to_carts": 2 }], "transaction": [] } });
    let (status, _) = post("/calculate-revenue", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn create_analysis_rejects_missing_transaction_with_500() {
    let body = json!({ "raw_data": { "overall": [{ "variation": "Control", "users": 10, "user_add_to_carts": 2 }], "transaction": [] } });
    let (status, _) = post("/create-analysis", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validate_data_never_fails_on_well_formed_json() {
    let (status, body) = post("/validate-data", json!([])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_valid"], true);
}

#[tokio::test]
async fn calculate_overview_end_to_end_happy_path() {
    let body = json!({
        "overall": [
            { "variation": "Control", "users": 1000, "user_add_to_carts": 300 },
            { "variation": "V1", "users": 1000, "user_add_to_carts": 330 }
        ],
        "transaction": [
            { "transaction_id": "T1", "variation": "Control", "revenue": 50.0, "quantity": 1 },
            { "transaction_id": "T2", "variation": "V1", "revenue": 55.0, "quantity": 1 }
        ]
    });

    let (status, parsed) = post("/calculate-overview", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["control"], "Control");
    assert!(parsed["data"]["Control"]["users"]["uplift"].as_f64().unwrap().abs() < f64::EPSILON);
}
