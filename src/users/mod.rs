use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod repo;
pub(crate) mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
