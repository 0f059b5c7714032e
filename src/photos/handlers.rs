use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{AppJson, AppPath, AppQuery},
    photos::{
        dto::{
            CreatePhotoRequest, ListQuery, MessageResponse, PhotoList, ReorderRequest,
            UpdatePhotoRequest,
        },
        repo_types::Photo,
        services,
    },
    state::AppState,
};

pub fn photo_routes() -> Router<AppState> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route("/photos/reorder", post(reorder_photos))
        .route(
            "/photos/:id",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
}

#[instrument(skip(state, _user))]
pub async fn list_photos(
    State(state): State<AppState>,
    _user: AuthUser,
    AppQuery(q): AppQuery<ListQuery>,
) -> Result<Json<PhotoList>, AppError> {
    let filters = services::filters_from_query(q);
    let (data, total) = services::list_photos(&state.db, &filters).await?;
    Ok(Json(PhotoList { data, total }))
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn create_photo(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<CreatePhotoRequest>,
) -> Result<(StatusCode, Json<Photo>), AppError> {
    let photo = services::create_photo(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

#[instrument(skip(state, _user))]
pub async fn get_photo(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Photo>, AppError> {
    Ok(Json(services::get_photo(&state.db, id).await?))
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn update_photo(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<UpdatePhotoRequest>,
) -> Result<Json<Photo>, AppError> {
    Ok(Json(services::update_photo(&state.db, id, body).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_photo(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    services::delete_photo(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Photo deleted successfully")))
}

/// POST /photos/reorder
#[instrument(skip(state, user, body), fields(user_id = user.id, count = body.orders.len()))]
pub async fn reorder_photos(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<ReorderRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    services::reorder_photos(&state.db, &body.orders).await?;
    Ok(Json(MessageResponse::new("Display order updated successfully")))
}
