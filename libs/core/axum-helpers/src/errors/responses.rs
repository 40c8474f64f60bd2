//! Reusable OpenAPI responses, referenced from `#[utoipa::path]` as
//! `(status = 404, response = NotFoundResponse)`.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "DATABASE_ERROR",
        "message": "server selection timeout",
        "details": { "error": "server selection timeout", "trace": "Error { kind: ServerSelection .. }" }
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Missing required field: name"
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_UUID",
        "message": "Invalid UUID format"
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Seed product 0190f1c2-7a4e-7d10-8c3b-2f6a1e9d4b00 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - Authentication required",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAUTHORIZED",
        "message": "Authentication required"
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Forbidden - Caller does not own the record",
    content_type = "application/json",
    example = json!({
        "code": 1007,
        "error": "FORBIDDEN",
        "message": "Not authorized to modify this seed product"
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Rejected by current state",
    content_type = "application/json",
    example = json!({
        "code": 1008,
        "error": "CONFLICT",
        "message": "Product already reviewed"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);
