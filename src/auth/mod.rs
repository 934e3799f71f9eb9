use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use uuid::Uuid;

use crate::models::user::Role;
use crate::state::AppState;
use crate::utils::error::AppError;

pub mod password;
pub mod session;

/// Verified identity attached to an authenticated request. Downstream code
/// treats these claims as authorization facts and never re-derives them.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden("Forbidden".to_string()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_cookie(parts)
            .or_else(|| token_from_bearer(parts))
            .ok_or_else(|| AppError::AuthError("Unauthorized".to_string()))?;

        let claims = session::verify_token(&token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

fn token_from_cookie(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == "token" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn token_from_bearer(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    raw.strip_prefix("Bearer ").map(|t| t.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: &'static str, value: &str) -> Parts {
        let request = Request::builder()
            .header(header, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn bearer_header_is_extracted() {
        let parts = parts_with("authorization", "Bearer abc.def.ghi");
        assert_eq!(token_from_bearer(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_token_is_extracted() {
        let parts = parts_with("cookie", "theme=dark; token=abc.def.ghi");
        assert_eq!(token_from_cookie(&parts).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_token_yields_none() {
        let parts = parts_with("cookie", "theme=dark");
        assert!(token_from_cookie(&parts).is_none());
        assert!(token_from_bearer(&parts).is_none());
    }

    #[test]
    fn require_role_checks_membership() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::Student,
        };
        assert!(user.require_role(Role::Student).is_ok());
        assert!(matches!(
            user.require_role(Role::Admin),
            Err(AppError::Forbidden(_))
        ));
    }
}
