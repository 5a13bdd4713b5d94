//! Body, path and query extractors that reject with [`AppError`].
//!
//! axum's own rejections answer 422 or 400 with serde's message in the body.
//! These wrappers answer a plain 400 instead and keep the detail in the logs.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// URL path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// URL query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        Self::BadRequest("Invalid request body".to_owned())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected path");
        Self::BadRequest("Invalid id".to_owned())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        Self::BadRequest("Invalid query".to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        count: u32,
    }

    async fn extract(body: &'static str) -> Result<AppJson<Payload>, AppError> {
        let request = Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        AppJson::<Payload>::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_type_mismatch_is_plain_400() {
        let err = extract(r#"{"count":"many"}"#).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Invalid request body");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let err = extract("{").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        assert!(extract(r#"{"count":3}"#).await.is_ok());
    }
}
