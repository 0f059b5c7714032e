use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Identity of the caller, taken from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authorization header required".into()))?;

        // Expect "Bearer <token>"
        let token = match header.split_once(' ') {
            Some((scheme, token)) if scheme == "Bearer" && !token.is_empty() => token,
            _ => {
                return Err(AppError::Unauthorized(
                    "Invalid authorization header format".into(),
                ))
            }
        };

        let claims = state.auth.keys().verify(token).map_err(|e| {
            warn!(error = %e, "bearer token rejected");
            AppError::from(e)
        })?;

        Ok(AuthUser {
            id: claims.user_id,
            username: claims.username,
            role: claims.role,
        })
    }
}
