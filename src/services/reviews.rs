use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthUser;
use crate::models::booking::BookingStatus;
use crate::models::review::{ReviewRow, ReviewView, TutorReviews};
use crate::utils::error::AppError;
use crate::utils::validate::check;

const REVIEW_SELECT: &str = "\
    SELECT r.id, r.student_id, r.tutor_profile_id, r.rating, r.comment, r.created_at, \
           u.name AS student_name \
      FROM reviews r \
      JOIN users u ON u.id = r.student_id";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub tutor_profile_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// Mean of the ratings, rounded half-away-from-zero to one decimal for
/// presentation. Zero when there are no ratings.
pub fn average_rating(ratings: &[i32]) -> Decimal {
    if ratings.is_empty() {
        return Decimal::ZERO;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    (Decimal::from(sum) / Decimal::from(ratings.len() as i64))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

pub async fn create_review(
    pool: &PgPool,
    caller: &AuthUser,
    payload: CreateReviewRequest,
) -> Result<ReviewView, AppError> {
    check(&payload)?;

    let tutor_user_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT user_id FROM tutor_profiles WHERE id = $1",
    )
    .bind(payload.tutor_profile_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Tutor profile not found".to_string()))?;

    // Reviews are gated on a completed session with this tutor.
    let has_completed = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
            SELECT 1 FROM bookings \
             WHERE student_id = $1 AND tutor_id = $2 AND status = $3)",
    )
    .bind(caller.user_id)
    .bind(tutor_user_id)
    .bind(BookingStatus::Completed)
    .fetch_one(pool)
    .await?;

    if !has_completed {
        return Err(AppError::validation(
            "You must complete a session with this tutor before leaving a review",
        ));
    }

    let already_reviewed = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS( \
            SELECT 1 FROM reviews WHERE student_id = $1 AND tutor_profile_id = $2)",
    )
    .bind(caller.user_id)
    .bind(payload.tutor_profile_id)
    .fetch_one(pool)
    .await?;

    if already_reviewed {
        return Err(AppError::Conflict(
            "You have already reviewed this tutor".to_string(),
        ));
    }

    let review_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO reviews (student_id, tutor_profile_id, rating, comment) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(caller.user_id)
    .bind(payload.tutor_profile_id)
    .bind(payload.rating)
    .bind(&payload.comment)
    .fetch_one(pool)
    .await?;

    let row = sqlx::query_as::<_, ReviewRow>(&format!("{REVIEW_SELECT} WHERE r.id = $1"))
        .bind(review_id)
        .fetch_one(pool)
        .await?;

    Ok(row.into_view())
}

/// Reviews for a tutor identified by their user id, newest first, with the
/// aggregate rating.
pub async fn tutor_reviews(pool: &PgPool, tutor_user_id: Uuid) -> Result<TutorReviews, AppError> {
    let profile_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM tutor_profiles WHERE user_id = $1",
    )
    .bind(tutor_user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Tutor profile not found".to_string()))?;

    let rows = sqlx::query_as::<_, ReviewRow>(&format!(
        "{REVIEW_SELECT} WHERE r.tutor_profile_id = $1 ORDER BY r.created_at DESC"
    ))
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    let ratings: Vec<i32> = rows.iter().map(|r| r.rating).collect();
    let total_reviews = rows.len() as i64;
    let reviews = rows.into_iter().map(ReviewRow::into_view).collect();

    Ok(TutorReviews {
        reviews,
        average_rating: average_rating(&ratings),
        total_reviews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn empty_ratings_average_to_zero() {
        assert_eq!(average_rating(&[]), Decimal::ZERO);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        // (5 + 4 + 4) / 3 = 4.333... → 4.3
        assert_eq!(average_rating(&[5, 4, 4]), dec("4.3"));
        // (5 + 4) / 2 = 4.5 stays 4.5
        assert_eq!(average_rating(&[5, 4]), dec("4.5"));
        // (4 + 3) / 2 = 3.5; (3 + 4 + 4 + 4) / 4 = 3.75 → 3.8 (half away from zero)
        assert_eq!(average_rating(&[3, 4, 4, 4]), dec("3.8"));
    }

    #[test]
    fn single_rating_is_its_own_average() {
        assert_eq!(average_rating(&[5]), dec("5"));
    }
}
