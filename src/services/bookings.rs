//! Booking engine: interval validation, per-tutor conflict detection and
//! pricing. The conflict scan and insert run inside one transaction holding
//! a per-tutor advisory lock, so two concurrent requests for the same tutor
//! cannot both pass the scan and double-book a slot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::booking::{
    Booking, BookingDetailRow, BookingStatus, BookingView, ACTIVE_STATUSES,
};
use crate::models::user::Role;
use crate::services::tutors::resolve_tutor;
use crate::utils::error::AppError;

pub(crate) const BOOKING_DETAIL_SELECT: &str = "\
    SELECT b.id, b.student_id, b.tutor_id, b.start_time, b.end_time, \
           b.total_price, b.status, b.created_at, b.updated_at, \
           s.name AS student_name, s.email AS student_email, \
           t.name AS tutor_name, t.email AS tutor_email, \
           p.id AS profile_id, p.bio AS profile_bio, \
           p.hourly_rate AS profile_hourly_rate, \
           p.subjects AS profile_subjects, p.availability AS profile_availability \
      FROM bookings b \
      JOIN users s ON s.id = b.student_id \
      JOIN users t ON t.id = b.tutor_id \
      LEFT JOIN tutor_profiles p ON p.user_id = b.tutor_id";

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub tutor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Statuses a booking party may request. Creation is the only path to
/// CONFIRMED; PENDING is never assigned.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusChange {
    Cancelled,
    Completed,
}

impl From<StatusChange> for BookingStatus {
    fn from(change: StatusChange) -> Self {
        match change {
            StatusChange::Cancelled => BookingStatus::Cancelled,
            StatusChange::Completed => BookingStatus::Completed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: StatusChange,
}

/// Half-open `[start, end)` overlap test. Touching endpoints (one interval
/// ending exactly when the other starts) do not overlap, so back-to-back
/// bookings are legal.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Price of a session: duration in (fractional) hours times the tutor's
/// hourly rate. Stored unrounded; presentation rounds if it wants to.
pub fn session_price(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: Decimal,
) -> Decimal {
    let seconds = (end - start).num_seconds();
    Decimal::from(seconds) * hourly_rate / Decimal::from(3600)
}

pub async fn create_booking(
    pool: &PgPool,
    caller: &AuthUser,
    payload: CreateBookingRequest,
) -> Result<BookingView, AppError> {
    let tutor = resolve_tutor(pool, payload.tutor_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tutor not found".to_string()))?;

    if payload.end_time <= payload.start_time {
        return Err(AppError::validation("End time must be after start time"));
    }

    let mut tx = pool.begin().await?;

    // Serializes concurrent bookers of this tutor for the rest of the
    // transaction; released automatically at commit/rollback.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
        .bind(tutor.user_id)
        .execute(&mut *tx)
        .await?;

    let conflict = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM bookings \
          WHERE tutor_id = $1 AND status = ANY($2) \
            AND start_time < $4 AND end_time > $3 \
          LIMIT 1",
    )
    .bind(tutor.user_id)
    .bind(ACTIVE_STATUSES.to_vec())
    .bind(payload.start_time)
    .bind(payload.end_time)
    .fetch_optional(&mut *tx)
    .await?;

    if conflict.is_some() {
        return Err(AppError::Conflict("Time slot already booked".to_string()));
    }

    let total_price = session_price(payload.start_time, payload.end_time, tutor.hourly_rate);

    // tutor_id is always the resolved user id, even when the caller passed
    // a profile id.
    let booking_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO bookings (student_id, tutor_id, start_time, end_time, total_price, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(caller.user_id)
    .bind(tutor.user_id)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .bind(total_price)
    .bind(BookingStatus::Confirmed)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        booking_id = %booking_id,
        tutor_id = %tutor.user_id,
        student_id = %caller.user_id,
        "Booking created"
    );

    fetch_view(pool, booking_id).await
}

pub async fn list_bookings(pool: &PgPool, caller: &AuthUser) -> Result<Vec<BookingView>, AppError> {
    let party_column = if caller.role == Role::Student {
        "b.student_id"
    } else {
        "b.tutor_id"
    };

    let rows = sqlx::query_as::<_, BookingDetailRow>(&format!(
        "{BOOKING_DETAIL_SELECT} WHERE {party_column} = $1 \
         ORDER BY b.start_time DESC, b.created_at DESC"
    ))
    .bind(caller.user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BookingDetailRow::into_view).collect())
}

pub async fn get_booking(
    pool: &PgPool,
    caller: &AuthUser,
    booking_id: Uuid,
) -> Result<BookingView, AppError> {
    let row = sqlx::query_as::<_, BookingDetailRow>(&format!(
        "{BOOKING_DETAIL_SELECT} WHERE b.id = $1"
    ))
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if row.student_id != caller.user_id && row.tutor_id != caller.user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    Ok(row.into_view())
}

pub async fn update_status(
    pool: &PgPool,
    caller: &AuthUser,
    booking_id: Uuid,
    payload: UpdateBookingStatusRequest,
) -> Result<BookingView, AppError> {
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
        .bind(booking_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.student_id != caller.user_id && booking.tutor_id != caller.user_id {
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    // Transitions are intentionally permissive for booking parties; the
    // request schema limits which statuses are reachable.
    sqlx::query("UPDATE bookings SET status = $2, updated_at = now() WHERE id = $1")
        .bind(booking_id)
        .bind(BookingStatus::from(payload.status))
        .execute(pool)
        .await?;

    fetch_view(pool, booking_id).await
}

async fn fetch_view(pool: &PgPool, booking_id: Uuid) -> Result<BookingView, AppError> {
    let row = sqlx::query_as::<_, BookingDetailRow>(&format!(
        "{BOOKING_DETAIL_SELECT} WHERE b.id = $1"
    ))
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    Ok(row.into_view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    // Small helpers: a clock time on a fixed day, and a decimal literal.
    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn new_interval_starting_inside_existing_conflicts() {
        // existing [10:00, 11:00), new [10:30, 11:30)
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(10, 30), at(11, 30)));
    }

    #[test]
    fn new_interval_ending_inside_existing_conflicts() {
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(9, 30), at(10, 30)));
    }

    #[test]
    fn new_interval_containing_existing_conflicts() {
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(9, 0), at(12, 0)));
    }

    #[test]
    fn identical_intervals_conflict() {
        assert!(intervals_overlap(at(10, 0), at(11, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn touching_endpoints_do_not_conflict() {
        // existing [10:00, 11:00): [11:00, 12:00) and [09:00, 10:00) are fine
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(11, 0), at(12, 0)));
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_conflict() {
        assert!(!intervals_overlap(at(10, 0), at(11, 0), at(13, 0), at(14, 0)));
    }

    #[test]
    fn price_for_fractional_hours() {
        // rate 20.0, 10:00 → 11:30 = 1.5h → 30.0
        let price = session_price(at(10, 0), at(11, 30), dec("20.0"));
        assert_eq!(price, dec("30.0"));
    }

    #[test]
    fn price_for_whole_hours() {
        let price = session_price(at(9, 0), at(12, 0), dec("45.50"));
        assert_eq!(price, dec("136.50"));
    }

    #[test]
    fn price_for_short_session_keeps_precision() {
        // 15 minutes at 10/h = 2.5, no premature rounding
        let price = session_price(at(10, 0), at(10, 15), dec("10"));
        assert_eq!(price, dec("2.5"));
    }

    #[test]
    fn status_change_maps_to_terminal_statuses() {
        assert_eq!(
            BookingStatus::from(StatusChange::Cancelled),
            BookingStatus::Cancelled
        );
        assert_eq!(
            BookingStatus::from(StatusChange::Completed),
            BookingStatus::Completed
        );
    }

    #[test]
    fn status_change_rejects_non_terminal_input() {
        assert!(serde_json::from_str::<StatusChange>("\"CONFIRMED\"").is_err());
        assert!(serde_json::from_str::<StatusChange>("\"PENDING\"").is_err());
        assert!(serde_json::from_str::<StatusChange>("\"CANCELLED\"").is_ok());
    }
}
