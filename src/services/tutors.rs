use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::models::category::Category;
use crate::models::tutor::{TutorProfile, TutorRow, TutorView};
use crate::models::user::{Role, User};
use crate::utils::error::AppError;
use crate::utils::validate::check;

const TUTOR_SELECT: &str = "\
    SELECT u.id AS user_id, u.name, u.email, \
           p.id AS profile_id, p.bio, p.hourly_rate, p.subjects, p.availability, \
           p.created_at AS profile_created_at, p.updated_at AS profile_updated_at \
      FROM users u \
      JOIN tutor_profiles p ON p.user_id = u.id";

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    #[validate(length(min = 1, message = "At least one subject is required"))]
    pub subjects: Vec<String>,
    pub category_ids: Option<Vec<Uuid>>,
    pub availability: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: Value,
}

/// Resolve a tutor from an identifier that may be either the owning user's
/// id or the profile's own id. User id wins when both spaces match.
pub async fn resolve_tutor(pool: &PgPool, tutor_ref: Uuid) -> Result<Option<TutorRow>, AppError> {
    let by_user = sqlx::query_as::<_, TutorRow>(&format!("{TUTOR_SELECT} WHERE u.id = $1"))
        .bind(tutor_ref)
        .fetch_optional(pool)
        .await?;
    if by_user.is_some() {
        return Ok(by_user);
    }

    let by_profile = sqlx::query_as::<_, TutorRow>(&format!("{TUTOR_SELECT} WHERE p.id = $1"))
        .bind(tutor_ref)
        .fetch_optional(pool)
        .await?;
    Ok(by_profile)
}

pub async fn list_tutors(pool: &PgPool) -> Result<Vec<TutorView>, AppError> {
    let rows = sqlx::query_as::<_, TutorRow>(&format!("{TUTOR_SELECT} ORDER BY u.name ASC"))
        .fetch_all(pool)
        .await?;

    let profile_ids: Vec<Uuid> = rows.iter().map(|r| r.profile_id).collect();
    let mut categories = categories_by_profile(pool, &profile_ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let cats = categories.remove(&row.profile_id).unwrap_or_default();
            row.into_view(cats)
        })
        .collect())
}

pub async fn get_tutor(pool: &PgPool, tutor_ref: Uuid) -> Result<TutorView, AppError> {
    let row = resolve_tutor(pool, tutor_ref)
        .await?
        .ok_or_else(|| AppError::NotFound("Tutor not found".to_string()))?;

    let cats = categories_by_profile(pool, &[row.profile_id])
        .await?
        .remove(&row.profile_id)
        .unwrap_or_default();

    Ok(row.into_view(cats))
}

pub async fn upsert_profile(
    pool: &PgPool,
    caller: &AuthUser,
    payload: UpsertProfileRequest,
) -> Result<TutorView, AppError> {
    check(&payload)?;
    if payload.hourly_rate <= Decimal::ZERO {
        return Err(AppError::validation("Hourly rate must be positive"));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(caller.user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.role != Role::Tutor {
        return Err(AppError::Forbidden(
            "Only tutors can create profiles".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let profile = sqlx::query_as::<_, TutorProfile>(
        "INSERT INTO tutor_profiles (user_id, bio, hourly_rate, subjects, availability) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (user_id) DO UPDATE \
            SET bio = EXCLUDED.bio, \
                hourly_rate = EXCLUDED.hourly_rate, \
                subjects = EXCLUDED.subjects, \
                availability = COALESCE(EXCLUDED.availability, tutor_profiles.availability), \
                updated_at = now() \
         RETURNING *",
    )
    .bind(user.id)
    .bind(&payload.bio)
    .bind(payload.hourly_rate)
    .bind(&payload.subjects)
    .bind(&payload.availability)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(category_ids) = &payload.category_ids {
        sqlx::query("DELETE FROM tutor_profile_categories WHERE tutor_profile_id = $1")
            .bind(profile.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO tutor_profile_categories (tutor_profile_id, category_id) \
             SELECT $1, unnest($2::uuid[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(profile.id)
        .bind(category_ids)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let cats = categories_by_profile(pool, &[profile.id])
        .await?
        .remove(&profile.id)
        .unwrap_or_default();

    Ok(TutorView {
        id: user.id,
        name: user.name,
        email: user.email,
        profile,
        categories: cats,
    })
}

pub async fn update_availability(
    pool: &PgPool,
    caller: &AuthUser,
    payload: UpdateAvailabilityRequest,
) -> Result<TutorProfile, AppError> {
    sqlx::query_as::<_, TutorProfile>(
        "UPDATE tutor_profiles SET availability = $2, updated_at = now() \
         WHERE user_id = $1 RETURNING *",
    )
    .bind(caller.user_id)
    .bind(&payload.availability)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Tutor profile not found".to_string()))
}

async fn categories_by_profile(
    pool: &PgPool,
    profile_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Category>>, AppError> {
    if profile_ids.is_empty() {
        return Ok(HashMap::new());
    }

    #[derive(sqlx::FromRow)]
    struct LinkRow {
        tutor_profile_id: Uuid,
        #[sqlx(flatten)]
        category: Category,
    }

    let rows = sqlx::query_as::<_, LinkRow>(
        "SELECT tc.tutor_profile_id, c.id, c.name, c.description, c.created_at, c.updated_at \
           FROM tutor_profile_categories tc \
           JOIN categories c ON c.id = tc.category_id \
          WHERE tc.tutor_profile_id = ANY($1) \
          ORDER BY c.name ASC",
    )
    .bind(profile_ids)
    .fetch_all(pool)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<Category>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.tutor_profile_id)
            .or_default()
            .push(row.category);
    }
    Ok(grouped)
}
