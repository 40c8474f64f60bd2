//! Error codes carried by every [`ErrorResponse`](super::ErrorResponse).
//!
//! Each code has a SCREAMING_SNAKE_CASE identifier for clients, an integer for
//! logs and dashboards, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::Forbidden.as_str(), "FORBIDDEN");
//! assert_eq!(ErrorCode::Forbidden.code(), 1007);
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use utoipa::ToSchema;

/// Integer ranges:
/// - 1000-1999: client errors
/// - 2000-2999: database errors
/// - 5000-5999: serialization errors
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    InternalError,
    Unauthorized,
    /// Authenticated, but not the owner of the record
    Forbidden,
    /// Write rejected by current state, e.g. a second review by the same user
    Conflict,
    ServiceUnavailable,

    // Database errors
    DatabaseError,

    // Serialization
    SerdeJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::ServiceUnavailable => 1011,

            Self::DatabaseError => 2003,

            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_representation_matches_serde() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::Conflict,
            ErrorCode::SerdeJsonError,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.to_string(), code.as_str());
        }
    }

    #[test]
    fn test_integer_codes() {
        assert_eq!(ErrorCode::ValidationError.code(), 1001);
        assert_eq!(ErrorCode::Forbidden.code(), 1007);
        assert_eq!(ErrorCode::Conflict.code(), 1008);
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
    }

    #[test]
    fn test_deserialization() {
        let code: ErrorCode = serde_json::from_str("\"INVALID_UUID\"").unwrap();
        assert_eq!(code, ErrorCode::InvalidUuid);
    }
}
