use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::models::user::Role;
use crate::utils::error::AppError;

/// Session claims carried in the signed token. The booking core and every
/// guarded handler trust these without re-reading the users table.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: Uuid, role: Role, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role,
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn sign_token(user_id: Uuid, role: Role, config: &Config) -> Result<String, AppError> {
    let claims = SessionClaims::new(user_id, role, config.token_ttl_hours);
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::InternalServerError(format!("sign session token: {e}")))
}

pub fn verify_token(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<SessionClaims>(token, &key, &Validation::default()).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthError("Token expired".to_string())
            }
            _ => AppError::AuthError("Invalid token".to_string()),
        }
    })?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            port: 0,
            jwt_secret: "test-secret-key".to_string(),
            token_ttl_hours: 1,
            client_urls: vec![],
        }
    }

    #[test]
    fn round_trip_preserves_claims() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = sign_token(user_id, Role::Student, &config).unwrap();
        let claims = verify_token(&token, &config.jwt_secret).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Student);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let config = test_config();
        let token = sign_token(Uuid::new_v4(), Role::Tutor, &config).unwrap();

        let err = verify_token(&token, "other-secret").unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let err = verify_token("not.a.jwt", "test-secret-key").unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            role: Role::Student,
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };
        let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let token = encode(&Header::default(), &claims, &key).unwrap();

        let err = verify_token(&token, &config.jwt_secret).unwrap_err();
        match err {
            AppError::AuthError(msg) => assert_eq!(msg, "Token expired"),
            other => panic!("expected auth error, got {other:?}"),
        }
    }
}
