//! Reusable OpenAPI response types for handler annotations.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({"detail": "Database error occurred"})
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable Entity - field validation failed",
    content_type = "application/json",
    example = json!({
        "detail": [{
            "loc": ["body", "quantity"],
            "msg": "ensure this value is greater than or equal to 0",
            "type": "value_error.range"
        }]
    })
)]
pub struct ValidationErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable Entity - invalid UUID",
    content_type = "application/json",
    example = json!({"detail": "Invalid UUID: not-a-uuid"})
)]
pub struct InvalidUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({"detail": "Not Found"})
)]
pub struct NotFoundResponse(pub ErrorResponse);
