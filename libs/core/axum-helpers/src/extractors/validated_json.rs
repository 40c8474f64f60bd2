use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that must also pass `validator` rules.
///
/// Malformed JSON rejects as `JSON_EXTRACTION`; rule violations reject as
/// `VALIDATION_ERROR` with the per-field errors in `details`.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Rating {
        #[validate(range(min = 1, max = 5))]
        rating: i32,
    }

    async fn accept(ValidatedJson(body): ValidatedJson<Rating>) -> String {
        body.rating.to_string()
    }

    async fn post_json(body: &str) -> (StatusCode, serde_json::Value) {
        let app = Router::new().route("/", post(accept));
        let response = app
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_out_of_range_is_validation_error() {
        let (status, body) = post_json(r#"{"rating": 9}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["details"].to_string().contains("rating"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_extraction_error() {
        let (status, body) = post_json("{").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "JSON_EXTRACTION");
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = post_json(r#"{"rating": 4}"#).await;
        assert_eq!(status, StatusCode::OK);
    }
}
