use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{password, session};
use crate::config::Config;
use crate::models::tutor::TutorProfile;
use crate::models::user::{Role, SafeUser, User};
use crate::utils::error::AppError;
use crate::utils::validate::check;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: SafeUser,
    pub token: String,
}

/// User plus their tutor profile, if any.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: SafeUser,
    pub tutor_profile: Option<TutorProfile>,
}

pub async fn register(
    pool: &PgPool,
    config: &Config,
    payload: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    check(&payload)?;

    let existing =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, name, role) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.name)
    .bind(payload.role)
    .fetch_one(pool)
    .await?;

    let token = session::sign_token(user.id, user.role, config)?;
    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

pub async fn login(
    pool: &PgPool,
    config: &Config,
    payload: LoginRequest,
) -> Result<AuthResponse, AppError> {
    check(&payload)?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = session::sign_token(user.id, user.role, config)?;

    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<ProfileView, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let tutor_profile =
        sqlx::query_as::<_, TutorProfile>("SELECT * FROM tutor_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(ProfileView {
        user: user.into(),
        tutor_profile,
    })
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    payload: UpdateProfileRequest,
) -> Result<ProfileView, AppError> {
    check(&payload)?;

    let updated = sqlx::query_as::<_, User>(
        "UPDATE users \
            SET name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                updated_at = now() \
          WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(&payload.name)
    .bind(&payload.email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let tutor_profile =
        sqlx::query_as::<_, TutorProfile>("SELECT * FROM tutor_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(ProfileView {
        user: updated.into(),
        tutor_profile,
    })
}
