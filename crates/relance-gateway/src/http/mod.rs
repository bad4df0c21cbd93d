pub mod auth;
pub mod clients;
pub mod health;
pub mod relances;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

/// Standard error tuple for handlers. Client-facing messages stay generic;
/// detail goes to the logs.
pub type ApiError = (StatusCode, Json<Value>);

pub fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// 400 response for an input validation failure, with the stable error code.
pub fn validation_error(e: relance_core::RelanceError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": e.to_string(), "code": e.code() })),
    )
}
