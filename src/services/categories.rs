use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::category::Category;
use crate::utils::error::AppError;
use crate::utils::validate::check;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn create_category(
    pool: &PgPool,
    payload: CreateCategoryRequest,
) -> Result<Category, AppError> {
    check(&payload)?;

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE name = $1")
        .bind(&payload.name)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Category already exists".to_string()));
    }

    let category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn update_category(
    pool: &PgPool,
    category_id: Uuid,
    payload: UpdateCategoryRequest,
) -> Result<Category, AppError> {
    check(&payload)?;

    let existing = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    if let Some(name) = &payload.name {
        if name != &existing.name {
            let duplicate =
                sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE name = $1")
                    .bind(name)
                    .fetch_optional(pool)
                    .await?;
            if duplicate.is_some() {
                return Err(AppError::Conflict(
                    "Category name already exists".to_string(),
                ));
            }
        }
    }

    let category = sqlx::query_as::<_, Category>(
        "UPDATE categories \
            SET name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                updated_at = now() \
          WHERE id = $1 RETURNING *",
    )
    .bind(category_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

pub async fn delete_category(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
    let deleted =
        sqlx::query_scalar::<_, Uuid>("DELETE FROM categories WHERE id = $1 RETURNING id")
            .bind(category_id)
            .fetch_optional(pool)
            .await?;

    if deleted.is_none() {
        return Err(AppError::NotFound("Category not found".to_string()));
    }
    Ok(())
}
