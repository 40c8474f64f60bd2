use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// ```ignore
/// async fn get_listing(UuidPath(id): UuidPath) -> String {
///     format!("listing {id}")
/// }
///
/// let app = Router::new().route("/seed-products/{id}", get(get_listing));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Uuid::parse_str(&raw)
            .map(UuidPath)
            .map_err(|e| AppError::UuidError(e).into_response())
    }
}
