//! JWT issue and validation.

use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
    /// Random per token, so two tokens issued within the same second differ.
    pub jti: Uuid,
}

/// HS256 signer holding the server secret.
///
/// The secret may be absent; issuing or validating then fails with
/// [`AppError::Config`] instead of panicking at startup.
#[derive(Clone)]
pub struct JwtSecret {
    secret: Option<String>,
}

impl JwtSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    pub(crate) fn key(&self) -> AppResult<&[u8]> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| AppError::Config("JWT secret is not configured".to_string()))
    }

    pub fn issue(&self, user_id: Uuid) -> AppResult<String> {
        let key = self.key()?;
        let now = Utc::now();
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(key))
            .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        let key = self.key()?;
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &DecodingKey::from_secret(key), &validation)
            .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> JwtSecret {
        JwtSecret::new(Some("test-jwt-secret-min-32-chars!!!!".to_string()))
    }

    #[test]
    fn issued_token_carries_user_id_and_one_hour_expiry() {
        let user_id = Uuid::new_v4();
        let token = secret().issue(user_id).unwrap();
        let claims = secret().validate(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
        let now = Utc::now().timestamp();
        assert!((claims.iat - now).abs() <= 5);
    }

    #[test]
    fn claim_is_named_user_id_on_the_wire() {
        let user_id = Uuid::new_v4();
        let token = secret().issue(user_id).unwrap();
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        let raw = decode::<serde_json::Value>(&token, &DecodingKey::from_secret(b""), &validation)
            .unwrap()
            .claims;
        assert_eq!(raw["userId"], user_id.to_string());
    }

    #[test]
    fn successive_tokens_differ() {
        let user_id = Uuid::new_v4();
        let a = secret().issue(user_id).unwrap();
        let b = secret().issue(user_id).unwrap();
        assert_ne!(a, b);
        assert_eq!(secret().validate(&a).unwrap().user_id, user_id);
        assert_eq!(secret().validate(&b).unwrap().user_id, user_id);
    }

    #[test]
    fn missing_secret_fails_issue() {
        let err = JwtSecret::new(None).issue(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!JwtSecret::new(Some(String::new())).is_configured());
    }

    #[test]
    fn token_from_other_secret_rejected() {
        let other = JwtSecret::new(Some("another-secret-of-sufficient-size".to_string()));
        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(secret().validate(&token), Err(AppError::Jwt(_))));
    }

    #[test]
    fn expired_token_rejected() {
        let claims = Claims {
            user_id: Uuid::new_v4(),
            iat: Utc::now().timestamp() - 2 * TOKEN_TTL_SECS,
            exp: Utc::now().timestamp() - TOKEN_TTL_SECS,
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-jwt-secret-min-32-chars!!!!"),
        )
        .unwrap();
        assert!(matches!(secret().validate(&token), Err(AppError::Jwt(_))));
    }
}
