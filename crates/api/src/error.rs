//! Maps the core error taxonomy onto HTTP status codes.
//!
//! `AppError::CalculationError` never reaches this layer: it is swallowed
//! inside the orchestrator and degrades to a zeroed metric instead.

use abtest_core::AppError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub struct ApiError(pub StatusCode, pub AppError);

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, err: AppError) -> Self {
        Self(status, err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status = match &err {
            AppError::InputMissing(_) | AppError::InputMalformed(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) | AppError::EnvelopeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::CalculationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.1, status = %self.0, "request failed");
        (self.0, Json(json!({ "success": false, "error": self.1.to_string() }))).into_response()
    }
}
