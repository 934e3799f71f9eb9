use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::models::booking::{BookingDetailRow, BookingStatus, BookingView};
use crate::models::user::Role;
use crate::services::bookings::BOOKING_DETAIL_SELECT;
use crate::utils::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub tutor_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Active,
    Ban,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AdminUserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub profile_id: Option<Uuid>,
    pub bio: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub subjects: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct AdminTutorProfile {
    pub id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    pub subjects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub tutor_profile: Option<AdminTutorProfile>,
}

impl AdminUserRow {
    fn into_view(self) -> AdminUserView {
        let tutor_profile = self.profile_id.map(|id| AdminTutorProfile {
            id,
            bio: self.bio,
            hourly_rate: self.hourly_rate.unwrap_or_default(),
            subjects: self.subjects.unwrap_or_default(),
        });
        AdminUserView {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
            tutor_profile,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusAck {
    pub message: String,
    pub user: AdminUserView,
}

#[derive(Debug, Serialize)]
pub struct Statistics {
    pub total_users: i64,
    pub total_students: i64,
    pub total_tutors: i64,
    pub total_bookings: i64,
    pub total_completed_bookings: i64,
    pub total_categories: i64,
    pub recent_bookings: Vec<BookingView>,
}

pub async fn list_users(pool: &PgPool, filter: UserFilter) -> Result<Vec<AdminUserView>, AppError> {
    let mut query = QueryBuilder::new(
        "SELECT u.id, u.email, u.name, u.role, u.created_at, \
                p.id AS profile_id, p.bio, p.hourly_rate, p.subjects \
           FROM users u \
           LEFT JOIN tutor_profiles p ON p.user_id = u.id \
          WHERE 1=1",
    );

    if let Some(role) = filter.role {
        query.push(" AND u.role = ");
        query.push_bind(role);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.to_lowercase());
        query.push(" AND (LOWER(u.name) LIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR LOWER(u.email) LIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    query.push(" ORDER BY u.created_at DESC");

    let rows: Vec<AdminUserRow> = query.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(AdminUserRow::into_view).collect())
}

pub async fn list_bookings(
    pool: &PgPool,
    filter: BookingFilter,
) -> Result<Vec<BookingView>, AppError> {
    let mut query = QueryBuilder::new(BOOKING_DETAIL_SELECT);
    query.push(" WHERE 1=1");

    if let Some(status) = filter.status {
        query.push(" AND b.status = ");
        query.push_bind(status);
    }
    if let Some(tutor_id) = filter.tutor_id {
        query.push(" AND b.tutor_id = ");
        query.push_bind(tutor_id);
    }
    if let Some(student_id) = filter.student_id {
        query.push(" AND b.student_id = ");
        query.push_bind(student_id);
    }

    query.push(" ORDER BY b.created_at DESC");

    let rows: Vec<BookingDetailRow> = query.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(BookingDetailRow::into_view).collect())
}

pub async fn statistics(pool: &PgPool) -> Result<Statistics, AppError> {
    let total_users = count(pool, "SELECT COUNT(*) FROM users", None).await?;
    let total_students = count(pool, "SELECT COUNT(*) FROM users WHERE role = $1", Some(Role::Student)).await?;
    let total_tutors = count(pool, "SELECT COUNT(*) FROM users WHERE role = $1", Some(Role::Tutor)).await?;
    let total_bookings = count(pool, "SELECT COUNT(*) FROM bookings", None).await?;
    let total_completed_bookings =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE status = $1")
            .bind(BookingStatus::Completed)
            .fetch_one(pool)
            .await?;
    let total_categories = count(pool, "SELECT COUNT(*) FROM categories", None).await?;

    let recent_rows = sqlx::query_as::<_, BookingDetailRow>(&format!(
        "{BOOKING_DETAIL_SELECT} ORDER BY b.created_at DESC LIMIT 5"
    ))
    .fetch_all(pool)
    .await?;

    Ok(Statistics {
        total_users,
        total_students,
        total_tutors,
        total_bookings,
        total_completed_bookings,
        total_categories,
        recent_bookings: recent_rows
            .into_iter()
            .map(BookingDetailRow::into_view)
            .collect(),
    })
}

/// Validates the target and acknowledges the change. There is no persisted
/// user-status column; this mirrors the account-moderation surface only.
pub async fn update_user_status(
    pool: &PgPool,
    user_id: Uuid,
    payload: UpdateUserStatusRequest,
) -> Result<StatusAck, AppError> {
    let row = sqlx::query_as::<_, AdminUserRow>(
        "SELECT u.id, u.email, u.name, u.role, u.created_at, \
                p.id AS profile_id, p.bio, p.hourly_rate, p.subjects \
           FROM users u \
           LEFT JOIN tutor_profiles p ON p.user_id = u.id \
          WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if row.role == Role::Admin {
        return Err(AppError::Forbidden("Cannot modify admin users".to_string()));
    }

    let status = match payload.status {
        UserStatus::Active => "ACTIVE",
        UserStatus::Ban => "BAN",
    };

    Ok(StatusAck {
        message: format!("User status updated to {status}"),
        user: row.into_view(),
    })
}

async fn count(pool: &PgPool, sql: &str, role: Option<Role>) -> Result<i64, AppError> {
    let mut query = sqlx::query_scalar::<_, i64>(sql);
    if let Some(role) = role {
        query = query.bind(role);
    }
    Ok(query.fetch_one(pool).await?)
}
