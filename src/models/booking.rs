use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::{PgHasArrayType, PgTypeInfo};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

// Postgres names the array type after the enum with a leading underscore.
impl PgHasArrayType for BookingStatus {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_booking_status")
    }
}

/// Statuses that reserve the tutor's time and participate in conflict
/// detection. PENDING is reserved but never assigned on creation.
pub const ACTIVE_STATUSES: [BookingStatus; 2] =
    [BookingStatus::Pending, BookingStatus::Confirmed];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookingParty {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TutorPartyProfile {
    pub id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    pub subjects: Vec<String>,
    pub availability: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct TutorParty {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile: Option<TutorPartyProfile>,
}

/// Booking enriched with summaries of both parties.
#[derive(Debug, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student: BookingParty,
    pub tutor: TutorParty,
}

/// Flat row from bookings joined against both users and the tutor profile.
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetailRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub student_name: String,
    pub student_email: String,
    pub tutor_name: String,
    pub tutor_email: String,
    pub profile_id: Option<Uuid>,
    pub profile_bio: Option<String>,
    pub profile_hourly_rate: Option<Decimal>,
    pub profile_subjects: Option<Vec<String>>,
    pub profile_availability: Option<Value>,
}

impl BookingDetailRow {
    pub fn into_view(self) -> BookingView {
        let profile = self.profile_id.map(|id| TutorPartyProfile {
            id,
            bio: self.profile_bio,
            hourly_rate: self.profile_hourly_rate.unwrap_or_default(),
            subjects: self.profile_subjects.unwrap_or_default(),
            availability: self.profile_availability,
        });

        BookingView {
            id: self.id,
            start_time: self.start_time,
            end_time: self.end_time,
            total_price: self.total_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            student: BookingParty {
                id: self.student_id,
                name: self.student_name,
                email: self.student_email,
            },
            tutor: TutorParty {
                id: self.tutor_id,
                name: self.tutor_name,
                email: self.tutor_email,
                profile,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(BookingStatus::Confirmed).unwrap(),
            "CONFIRMED"
        );
        assert_eq!(
            serde_json::to_value(BookingStatus::Cancelled).unwrap(),
            "CANCELLED"
        );
    }

    #[test]
    fn active_statuses_exclude_terminal_states() {
        assert!(ACTIVE_STATUSES.contains(&BookingStatus::Pending));
        assert!(ACTIVE_STATUSES.contains(&BookingStatus::Confirmed));
        assert!(!ACTIVE_STATUSES.contains(&BookingStatus::Cancelled));
        assert!(!ACTIVE_STATUSES.contains(&BookingStatus::Completed));
    }
}
