use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Tutor,
    Admin,
}

/// Full row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-facing user shape.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SafeUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for SafeUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Role::Student).unwrap(), "STUDENT");
        assert_eq!(serde_json::to_value(Role::Tutor).unwrap(), "TUTOR");
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "ADMIN");
    }

    #[test]
    fn safe_user_drops_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "secret".to_string(),
            name: "A".to_string(),
            role: Role::Student,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let safe: SafeUser = user.into();
        let json = serde_json::to_value(&safe).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
