use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TutorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    pub subjects: Vec<String>,
    pub availability: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tutor as listed in the catalog: owning user plus profile and tags.
#[derive(Debug, Serialize)]
pub struct TutorView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub profile: TutorProfile,
    pub categories: Vec<Category>,
}

/// Flat row produced by the users ⋈ tutor_profiles join.
#[derive(Debug, Clone, FromRow)]
pub struct TutorRow {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub profile_id: Uuid,
    pub bio: Option<String>,
    pub hourly_rate: Decimal,
    pub subjects: Vec<String>,
    pub availability: Option<Value>,
    pub profile_created_at: DateTime<Utc>,
    pub profile_updated_at: DateTime<Utc>,
}

impl TutorRow {
    pub fn into_view(self, categories: Vec<Category>) -> TutorView {
        TutorView {
            id: self.user_id,
            name: self.name,
            email: self.email,
            profile: TutorProfile {
                id: self.profile_id,
                user_id: self.user_id,
                bio: self.bio,
                hourly_rate: self.hourly_rate,
                subjects: self.subjects,
                availability: self.availability,
                created_at: self.profile_created_at,
                updated_at: self.profile_updated_at,
            },
            categories,
        }
    }
}
