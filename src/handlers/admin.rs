use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::Role;
use crate::services::admin::{self, BookingFilter, UpdateUserStatusRequest, UserFilter};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(filter): Query<UserFilter>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let users = admin::list_users(&state.pool, filter).await?;
    Ok(success(users, "Users fetched successfully"))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(filter): Query<BookingFilter>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let bookings = admin::list_bookings(&state.pool, filter).await?;
    Ok(success(bookings, "Bookings fetched successfully"))
}

pub async fn statistics(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let stats = admin::statistics(&state.pool).await?;
    Ok(success(stats, "Statistics fetched successfully"))
}

pub async fn update_user_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let ack = admin::update_user_status(&state.pool, user_id, payload).await?;
    Ok(success(ack, "User status updated"))
}
