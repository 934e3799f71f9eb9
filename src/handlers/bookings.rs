use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::Role;
use crate::services::bookings::{self, CreateBookingRequest, UpdateBookingStatusRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn create_booking(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Student)?;
    let booking = bookings::create_booking(&state.pool, &caller, payload).await?;
    Ok(created(booking, "Booking created successfully"))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Response, AppError> {
    let bookings = bookings::list_bookings(&state.pool, &caller).await?;
    Ok(success(bookings, "Bookings fetched successfully"))
}

pub async fn get_booking(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let booking = bookings::get_booking(&state.pool, &caller, booking_id).await?;
    Ok(success(booking, "Booking fetched successfully"))
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Response, AppError> {
    let booking = bookings::update_status(&state.pool, &caller, booking_id, payload).await?;
    Ok(success(booking, "Booking updated successfully"))
}
