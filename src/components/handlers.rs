use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    components::{
        dto::{AssignPhotoRequest, DataResponse, UpdateAssignmentRequest},
        repo_types::ComponentPhotoView,
        services,
    },
    error::AppError,
    extract::{AppJson, AppPath},
    photos::dto::MessageResponse,
    state::AppState,
};

/// Read-only route the public gallery pages call.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/components/:name/photos", get(photos_for_component))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/component-photos", post(assign_photo))
        .route(
            "/component-photos/:id",
            put(update_assignment).delete(remove_assignment),
        )
        .route("/photos/:id/components", get(components_for_photo))
}

#[instrument(skip(state, user, body), fields(user_id = user.id, component = %body.component_name))]
pub async fn assign_photo(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(body): AppJson<AssignPhotoRequest>,
) -> Result<(StatusCode, Json<ComponentPhotoView>), AppError> {
    let created = services::assign_photo(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, user, body), fields(user_id = user.id))]
pub async fn update_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<UpdateAssignmentRequest>,
) -> Result<Json<ComponentPhotoView>, AppError> {
    Ok(Json(services::update_assignment(&state.db, id, body).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn remove_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    services::remove_assignment(&state.db, id).await?;
    Ok(Json(MessageResponse::new(
        "Photo removed from component successfully",
    )))
}

#[instrument(skip(state))]
pub async fn photos_for_component(
    State(state): State<AppState>,
    AppPath(name): AppPath<String>,
) -> Result<Json<DataResponse<Vec<ComponentPhotoView>>>, AppError> {
    let data = services::photos_for_component(&state.db, &name).await?;
    Ok(Json(DataResponse { data }))
}

#[instrument(skip(state, _user))]
pub async fn components_for_photo(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<DataResponse<Vec<ComponentPhotoView>>>, AppError> {
    let data = services::components_for_photo(&state.db, id).await?;
    Ok(Json(DataResponse { data }))
}
