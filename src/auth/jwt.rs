//! Bearer token issuance and verification (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-on-first-run".to_string(),
            expiry_hours: 24,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id.
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// # Errors
///
/// Returns a 500-class `ApiError` when signing fails.
pub fn issue_token(user_id: Uuid, config: &JwtConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.expiry_hours)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal("Failed to issue token", Some(e.to_string())))
}

/// Check signature and expiry; the caller is responsible for confirming the
/// subject still exists.
///
/// # Errors
///
/// Returns 401 on any invalid, expired, or tampered token.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Invalid token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_verify_round_trip() {
        let config = JwtConfig::default();
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = JwtConfig {
            expiry_hours: -2,
            ..JwtConfig::default()
        };
        let token = issue_token(Uuid::new_v4(), &config).unwrap();
        assert!(verify_token(&token, &JwtConfig::default()).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), &JwtConfig::default()).unwrap();
        let other = JwtConfig {
            secret: "a-different-secret".to_string(),
            expiry_hours: 24,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not-a-jwt", &JwtConfig::default()).is_err());
    }
}
