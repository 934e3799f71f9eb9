use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::Role;
use crate::services::tutors::{self, UpdateAvailabilityRequest, UpsertProfileRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_tutors(State(state): State<AppState>) -> Result<Response, AppError> {
    let tutors = tutors::list_tutors(&state.pool).await?;
    Ok(success(tutors, "Tutors fetched successfully"))
}

pub async fn get_tutor(
    State(state): State<AppState>,
    Path(tutor_ref): Path<Uuid>,
) -> Result<Response, AppError> {
    let tutor = tutors::get_tutor(&state.pool, tutor_ref).await?;
    Ok(success(tutor, "Tutor fetched successfully"))
}

pub async fn upsert_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Tutor)?;
    let profile = tutors::upsert_profile(&state.pool, &caller, payload).await?;
    Ok(success(profile, "Profile saved successfully"))
}

pub async fn update_availability(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Tutor)?;
    let profile = tutors::update_availability(&state.pool, &caller, payload).await?;
    Ok(success(profile, "Availability updated successfully"))
}
