#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Search backend error (status {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Failed to parse backend response: {0}")]
    Parse(String),

    /// The backend accepted a model create but assigned a different id than
    /// requested. Typically triggered by large prompt payloads.
    #[error("Model id mismatch: requested '{expected_id}', backend assigned '{actual_id}'")]
    Consistency {
        expected_id: String,
        actual_id: String,
        payload_bytes: usize,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None)
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Upstream { status, body } => {
                tracing::error!("Upstream error ({status}): {body}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("Search backend returned status {status}"),
                    Some(json!({ "upstream_status": status, "upstream_body": body })),
                )
            }
            AppError::Timeout(msg) => {
                tracing::error!("Timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "TIMEOUT",
                    msg.clone(),
                    None,
                )
            }
            AppError::Parse(msg) => {
                tracing::error!("Parse error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PARSE_ERROR",
                    "Search backend returned an unparseable response".to_string(),
                    Some(json!({ "cause": msg })),
                )
            }
            AppError::Consistency {
                expected_id,
                actual_id,
                payload_bytes,
            } => {
                tracing::error!(
                    "Consistency fault: expected '{expected_id}', got '{actual_id}' \
                     (payload {payload_bytes} bytes)"
                );
                (
                    StatusCode::CONFLICT,
                    "CONSISTENCY_FAULT",
                    "Backend assigned a different model id than requested".to_string(),
                    Some(json!({
                        "expected_id": expected_id,
                        "actual_id": actual_id,
                        "payload_bytes": payload_bytes,
                    })),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(detail) = detail {
            error["detail"] = detail;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
