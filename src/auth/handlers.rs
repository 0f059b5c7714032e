use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{
            ChangePasswordRequest, CreateUserRequest, CreateUserResponse, LoginRequest,
            LoginResponse, PublicUser,
        },
        extractors::AuthUser,
        repo_types::User,
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Bootstrap route for the first admin; off in production.
pub fn signup_routes() -> Router<AppState> {
    Router::new().route("/auth/create-user", post(create_user))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/change-password", post(change_password))
        .route("/me", get(get_me))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("username and password are required"));
    }

    let (token, user) = state.auth.login(username, &payload.password).await?;
    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), AppError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(AppError::bad_request("username is required"));
    }

    let min_len = state.auth.policy().min_password_len;
    if payload.password.chars().count() < min_len {
        warn!("password too short");
        return Err(AppError::bad_request(format!(
            "password must be at least {} characters",
            min_len
        )));
    }

    let email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    if let Some(email) = &email {
        if !is_valid_email(email) {
            warn!(email = %email, "invalid email");
            return Err(AppError::bad_request("invalid email"));
        }
    }

    let user = state
        .auth
        .create_user(username, &payload.password, email.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: "User created successfully".into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<Json<PublicUser>, AppError> {
    if payload.old_password.is_empty() {
        return Err(AppError::bad_request("oldPassword is required"));
    }
    let min_len = state.auth.policy().min_password_len;
    if payload.new_password.chars().count() < min_len {
        return Err(AppError::bad_request(format!(
            "newPassword must be at least {} characters",
            min_len
        )));
    }

    let updated = state
        .auth
        .change_password(user.id, &payload.old_password, &payload.new_password)
        .await?;
    Ok(Json(updated.into()))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let found: Option<User> = state.auth.find_user(user.id).await?;
    match found {
        Some(u) => Ok(Json(u.into())),
        None => {
            error!(user_id = user.id, "token for a deleted user");
            Err(AppError::Unauthorized("User not found".into()))
        }
    }
}

#[cfg(test)]
mod handler_tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("alice@x.com"));
        assert!(!is_valid_email("alice"));
        assert!(!is_valid_email("alice@x"));
        assert!(!is_valid_email("al ice@x.com"));
    }

    #[test]
    fn test_public_user_hides_password_hash() {
        let now = time::OffsetDateTime::now_utc();
        let user = User {
            id: 1,
            username: "alice".into(),
            password_hash: "$argon2id$secret".into(),
            email: Some("alice@x.com".into()),
            role: "admin".into(),
            created_at: now,
            updated_at: now,
        };
        let raw = serde_json::to_string(&user).unwrap();
        assert!(!raw.contains("argon2"));

        let public: PublicUser = user.into();
        let json = serde_json::to_value(&public).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["role"], "admin");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
