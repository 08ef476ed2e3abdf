use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser},
        jwt::JwtKeys,
        password::verify_password,
    },
    error::{ApiError, ApiResult, AuthError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(payload) = payload?;

    let (Some(username), Some(password)) = (
        payload.username.filter(|s| !s.is_empty()),
        payload.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::Validation("Username and password required".into()));
    };

    let Some(user) = state.users.find_by_username(&username) else {
        warn!(%username, "login unknown username");
        return Err(AuthError::InvalidCredentials.into());
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = JwtKeys::from_ref(&state).sign(user)?;

    info!(user_id = user.id, %username, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        user: PublicUser {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
        },
    }))
}
