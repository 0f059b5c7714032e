//! Error type returned by every HTTP handler.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{auth::error::AuthError, db::StoreError, storage::StorageError};

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// Logged server-side; the client only sees a generic message.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text that is safe to hand to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref e) = self {
            error!(error = ?e, "internal error");
        }
        let status = self.status_code();
        let body = json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials
            | AuthError::ExpiredToken
            | AuthError::MalformedOrInvalidToken => AppError::Unauthorized(e.to_string()),
            AuthError::UserExists => AppError::Conflict(e.to_string()),
            AuthError::PasswordUnchanged => AppError::BadRequest(e.to_string()),
            AuthError::HashingFailure(_)
            | AuthError::SigningFailure(_)
            | AuthError::UpdateFailure(_)
            | AuthError::Store(_) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound("Resource not found".into()),
            StoreError::Duplicate => AppError::Conflict("Resource already exists".into()),
            StoreError::Backend(e) => AppError::Internal(e),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::from(e).into()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::InvalidFileExtension => AppError::BadRequest(
                "Invalid file extension. Only images are allowed (jpg, png, gif, webp, bmp)".into(),
            ),
            StorageError::Presign(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn auth_errors_map_to_status_codes() {
        assert_eq!(
            AppError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::ExpiredToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(AuthError::UserExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(AuthError::PasswordUnchanged).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(AuthError::UpdateFailure(StoreError::NotFound)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_map_to_status_codes() {
        assert_eq!(
            AppError::from(StoreError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(StoreError::Duplicate).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn internal_detail_never_reaches_the_body() {
        let err = AppError::from(AuthError::Store(StoreError::Backend(anyhow::anyhow!(
            "relation \"users\" does not exist"
        ))));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(res).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let res = AppError::from(AuthError::ExpiredToken).into_response();
        let body = body_json(res).await;
        assert_eq!(body["error"], "Token has expired");
    }
}
