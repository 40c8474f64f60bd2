use super::jwt::JwtClaims;
use crate::errors::AppError;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// The authenticated caller, taken from claims placed by the JWT middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<JwtClaims> for AuthUser {
    fn from(claims: JwtClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .map(AuthUser::from)
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            })
    }
}
