use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::auth::AuthUser;
use crate::services::auth::{self, LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let result = auth::register(&state.pool, &state.config, payload).await?;
    Ok(created(result, "User registered successfully"))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let result = auth::login(&state.pool, &state.config, payload).await?;
    Ok(success(result, "Login successful"))
}

pub async fn me(State(state): State<AppState>, caller: AuthUser) -> Result<Response, AppError> {
    let profile = auth::get_profile(&state.pool, caller.user_id).await?;
    Ok(success(profile, "Profile fetched successfully"))
}

pub async fn update_me(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Response, AppError> {
    let profile = auth::update_profile(&state.pool, caller.user_id, payload).await?;
    Ok(success(profile, "Profile updated successfully"))
}
