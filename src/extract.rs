//! `Json`, `Path` and `Query` wrappers whose rejections are [`AppError`]s,
//! so malformed input gets the same `{"error": ...}` body as every other failure.
use async_trait::async_trait;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| {
                debug!(error = %e, "json body rejected");
                AppError::BadRequest(format!("Invalid request body: {}", e.body_text()))
            })?;
        Ok(AppJson(value))
    }
}

pub struct AppPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                debug!(error = %e, "path rejected");
                AppError::bad_request("Invalid ID")
            })?;
        Ok(AppPath(value))
    }
}

pub struct AppQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::BadRequest(format!("Invalid query string: {}", e.body_text()))
            })?;
        Ok(AppQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct NamedBody {
        #[allow(dead_code)]
        name: String,
    }

    async fn json_handler(AppJson(_b): AppJson<NamedBody>) -> &'static str {
        "ok"
    }

    async fn path_handler(AppPath(id): AppPath<i64>) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/json", post(json_handler))
            .route("/items/:id", get(path_handler))
    }

    async fn error_of(res: axum::response::Response) -> (StatusCode, serde_json::Value) {
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_field_is_a_json_400() {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/json")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = error_of(app().oneshot(req).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn non_numeric_id_is_a_json_400() {
        let req = HttpRequest::builder()
            .uri("/items/abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = error_of(app().oneshot(req).await.unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid ID");
    }

    #[tokio::test]
    async fn valid_input_passes_through() {
        let req = HttpRequest::builder()
            .uri("/items/42")
            .body(Body::empty())
            .unwrap();
        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
