use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::models::ListingKind;

#[derive(Debug, Error)]
pub enum MarketplaceError {
    #[error("{} {id} not found", kind.label())]
    NotFound { kind: ListingKind, id: Uuid },

    #[error("Not authorized to modify this {}", kind.label().to_lowercase())]
    Forbidden { kind: ListingKind },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Product already reviewed")]
    DuplicateReview,

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MarketplaceResult<T> = Result<T, MarketplaceError>;

impl MarketplaceError {
    pub fn not_found(kind: ListingKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Convert MarketplaceError to AppError for standardized error responses
impl From<MarketplaceError> for AppError {
    fn from(err: MarketplaceError) -> Self {
        match err {
            e @ MarketplaceError::NotFound { .. } => AppError::NotFound(e.to_string()),
            e @ MarketplaceError::Forbidden { .. } => AppError::Forbidden(e.to_string()),
            MarketplaceError::Validation(msg) => AppError::BadRequest(msg),
            MarketplaceError::Body(rejection) => AppError::JsonExtractorRejection(rejection),
            e @ MarketplaceError::DuplicateReview => AppError::Conflict(e.to_string()),
            MarketplaceError::Database(e) => AppError::database(e),
            MarketplaceError::Serialization(e) => AppError::SerdeJson(e),
            MarketplaceError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for MarketplaceError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_messages() {
        let id = Uuid::nil();
        assert_eq!(
            MarketplaceError::not_found(ListingKind::Seed, id).to_string(),
            format!("Seed product {id} not found")
        );
        assert_eq!(
            MarketplaceError::Forbidden { kind: ListingKind::LendMachine }.to_string(),
            "Not authorized to modify this lend machine"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (MarketplaceError::not_found(ListingKind::Consumer, Uuid::nil()), StatusCode::NOT_FOUND),
            (MarketplaceError::Forbidden { kind: ListingKind::Seed }, StatusCode::FORBIDDEN),
            (MarketplaceError::Validation("Missing required field: name".into()), StatusCode::BAD_REQUEST),
            (MarketplaceError::DuplicateReview, StatusCode::CONFLICT),
            (MarketplaceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_validation_message_passes_through() {
        match AppError::from(MarketplaceError::Validation("price must be a non-negative number".into())) {
            AppError::BadRequest(msg) => assert_eq!(msg, "price must be a non-negative number"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
