use axum::{extract::FromRequestParts, http::header};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    config::AuthConfig,
    dto::auth::Claims,
    error::{AppError, AppResult},
    state::AppState,
};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Identity of the caller, taken from a `Bearer` JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

pub fn ensure_role(user: &AuthUser, role: &str) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, ROLE_ADMIN)
}

pub fn issue_token(config: &AuthConfig, user_id: Uuid, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(config.token_ttl())
        .ok_or_else(|| AppError::internal("Failed to set expiration"))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(AppError::internal)
}

pub fn decode_token(config: &AuthConfig, token: &str) -> AppResult<AuthUser> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    let user_id = Uuid::parse_str(&decoded.claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(AuthUser {
        user_id,
        role: decoded.claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_str = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        decode_token(&state.auth, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".into(),
            token_ttl_hours: 1,
            otp_ttl_minutes: 60,
        }
    }

    #[test]
    fn issued_token_round_trips_identity() {
        let id = Uuid::new_v4();
        let token = issue_token(&config(), id, ROLE_USER).unwrap();
        let user = decode_token(&config(), &token).unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.role, ROLE_USER);
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let mut other = config();
        other.jwt_secret = "someone-else".into();
        let token = issue_token(&other, Uuid::new_v4(), ROLE_USER).unwrap();
        assert!(matches!(
            decode_token(&config(), &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let mut expired = config();
        expired.token_ttl_hours = -2;
        let token = issue_token(&expired, Uuid::new_v4(), ROLE_USER).unwrap();
        assert!(matches!(
            decode_token(&config(), &token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn admin_guard() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: ROLE_USER.into(),
        };
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden)));
        let admin = AuthUser {
            role: ROLE_ADMIN.into(),
            ..user
        };
        assert!(ensure_admin(&admin).is_ok());
    }
}
