use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::user::Role;
use crate::services::categories::{self, CreateCategoryRequest, UpdateCategoryRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = categories::list_categories(&state.pool).await?;
    Ok(success(categories, "Categories fetched successfully"))
}

pub async fn create_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let category = categories::create_category(&state.pool, payload).await?;
    Ok(created(category, "Category created successfully"))
}

pub async fn update_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    let category = categories::update_category(&state.pool, category_id, payload).await?;
    Ok(success(category, "Category updated successfully"))
}

pub async fn delete_category(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(category_id): Path<Uuid>,
) -> Result<Response, AppError> {
    caller.require_role(Role::Admin)?;
    categories::delete_category(&state.pool, category_id).await?;
    Ok(empty_success("Category deleted successfully"))
}
