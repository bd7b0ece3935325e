//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
///
/// The body is always `{"error": <message>, "code": <stable code>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request from the client.
    BadRequest(String),
    /// Command rejected or failed.
    Domain(DomainError),
    /// Query failed.
    Store(StoreError),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Domain(err) => err.code(),
            ApiError::Store(err) => store_code(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let status = status_for(code);
        let message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Domain(err) => err.to_string(),
            ApiError::Store(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, code, "internal server error");
        }

        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn store_code(err: &StoreError) -> &'static str {
    match err {
        StoreError::NotFound { .. } => "NOT_FOUND",
        StoreError::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
        StoreError::Serialization(_) => "SERIALIZATION_ERROR",
        StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
    }
}

fn status_for(code: &str) -> StatusCode {
    match code {
        "NOT_FOUND" | "PLANT_NOT_FOUND" => StatusCode::NOT_FOUND,
        "BAD_REQUEST" | "INVALID_NAME" | "INVALID_CAPACITY" | "TRANSPLANT_SAME_GROWING_UNIT" => {
            StatusCode::BAD_REQUEST
        }
        "CONCURRENCY_CONFLICT"
        | "LOCATION_HAS_GROWING_UNITS"
        | "LOCATION_ALREADY_DELETED"
        | "GROWING_UNIT_HAS_PLANTS"
        | "GROWING_UNIT_ALREADY_DELETED"
        | "GROWING_UNIT_FULL_CAPACITY"
        | "GROWING_UNIT_CAPACITY_BELOW_PLANT_COUNT"
        | "PLANT_ALREADY_IN_GROWING_UNIT" => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}
