use crate::state::AppState;
use axum::Router;

pub mod claims;
pub(crate) mod dto;
pub mod handlers;
pub mod jwt;
mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
