use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::Role;
use crate::services::reviews::{self, CreateReviewRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

pub async fn create_review(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Student)?;
    let review = reviews::create_review(&state.pool, &caller, payload).await?;
    Ok(created(review, "Review created successfully"))
}

pub async fn tutor_reviews(
    State(state): State<AppState>,
    Path(tutor_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let reviews = reviews::tutor_reviews(&state.pool, tutor_id).await?;
    Ok(success(reviews, "Reviews fetched successfully"))
}
