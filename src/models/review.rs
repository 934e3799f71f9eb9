use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Review joined with the reviewing student's name.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_profile_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student_name: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewStudent {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub tutor_profile_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub student: ReviewStudent,
}

impl ReviewRow {
    pub fn into_view(self) -> ReviewView {
        ReviewView {
            id: self.id,
            tutor_profile_id: self.tutor_profile_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
            student: ReviewStudent {
                id: self.student_id,
                name: self.student_name,
            },
        }
    }
}

/// Aggregated view returned for a tutor's review listing.
#[derive(Debug, Serialize)]
pub struct TutorReviews {
    pub reviews: Vec<ReviewView>,
    pub average_rating: Decimal,
    pub total_reviews: i64,
}
