use super::jwt::JwtAuth;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

/// Token from `Authorization: Bearer <token>`, else from the `access_token` cookie.
pub(crate) fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                (name == "access_token" && !value.is_empty()).then(|| value.to_string())
            })
        })
}

/// Inserts [`JwtClaims`](super::JwtClaims) into request extensions when a valid
/// token is present.
///
/// Anonymous and invalid-token requests pass through untouched; protected
/// handlers reject them with 401 through [`AuthUser`](super::AuthUser).
pub async fn optional_jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token_from_request(request.headers()) {
        match auth.verify_token(&token) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring invalid JWT"),
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_header() {
        let map = headers(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(extract_token_from_request(&map).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_fallback() {
        let map = headers(header::COOKIE, "theme=dark; access_token=tok123; other=1");
        assert_eq!(extract_token_from_request(&map).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_missing_or_empty() {
        assert!(extract_token_from_request(&HeaderMap::new()).is_none());
        assert!(extract_token_from_request(&headers(header::AUTHORIZATION, "Bearer ")).is_none());
        assert!(extract_token_from_request(&headers(header::AUTHORIZATION, "Basic xyz")).is_none());
    }
}
