use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use claims::Claims;

pub fn router(allow_create_user: bool) -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::auth_routes())
        .merge(handlers::user_routes());
    if allow_create_user {
        router.merge(handlers::signup_routes())
    } else {
        router
    }
}
