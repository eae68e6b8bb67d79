pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// `detail` is a message string, or a list of field errors when body
/// validation fails:
///
/// ```json
/// {"detail": "Product not found with filter: 0b8d..."}
/// {"detail": [{"loc": ["body", "quantity"], "msg": "...", "type": "value_error.range"}]}
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: Value,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Value::String(detail.into()),
        }
    }
}

/// Application error type that converts into an HTTP response.
///
/// Domain crates convert their own errors into this type; each variant logs
/// with its [`ErrorCode`] before the body is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {}",
                    e
                );
                let status = match &e {
                    JsonRejection::JsonDataError(_)
                    | JsonRejection::JsonSyntaxError(_)
                    | JsonRejection::MissingJsonContentType(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    _ => e.status(),
                };
                (status, json!(e.body_text()))
            }
            AppError::ValidationError(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {}",
                    e
                );
                (StatusCode::UNPROCESSABLE_ENTITY, validation_detail(&e))
            }
            AppError::InvalidUuid(raw) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "Invalid UUID: {}",
                    raw
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!(format!("Invalid UUID: {}", raw)),
                )
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, json!(msg))
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!(
                    error_code = ErrorCode::UnprocessableEntity.code(),
                    "Unprocessable entity: {}",
                    msg
                );
                (StatusCode::UNPROCESSABLE_ENTITY, json!(msg))
            }
            AppError::Database(msg) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {}",
                    msg
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!(ErrorCode::DatabaseError.default_message()),
                )
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Flatten field errors into `[{loc, msg, type}]`, ordered by field name
fn validation_detail(errors: &ValidationErrors) -> Value {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    let items: Vec<Value> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let msg = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", err.code));
                json!({
                    "loc": ["body", field],
                    "msg": msg,
                    "type": format!("value_error.{}", err.code),
                })
            })
        })
        .collect();

    Value::Array(items)
}
