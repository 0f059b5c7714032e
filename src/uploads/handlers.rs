use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser, error::AppError, extract::AppJson, state::AppState,
    uploads::services::{presign_upload, PresignedUpload},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTokenRequest {
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/storage/upload-token", post(upload_token))
}

/// POST /storage/upload-token
#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn upload_token(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<UploadTokenRequest>,
) -> Result<Json<PresignedUpload>, AppError> {
    if body.filename.trim().is_empty() {
        return Err(AppError::bad_request("filename is required"));
    }
    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("storage not configured")))?;
    let content_type = body.content_type.as_deref().filter(|ct| !ct.is_empty());
    let out = presign_upload(storage.as_ref(), &body.filename, content_type).await?;
    Ok(Json(out))
}
