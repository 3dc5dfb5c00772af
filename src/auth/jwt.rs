//! JWT token verification (and generation, for tests/tooling)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserRole;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims carried by a bearer token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User role (BLOGGER | ISSUER | ADMIN)
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject into a user id
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::InvalidToken(e.to_string()))
    }

    /// Parse the role claim into the closed role enum
    pub fn user_role(&self) -> Result<UserRole, JwtError> {
        UserRole::parse(&self.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role '{}'", self.role)))
    }
}

/// Sign a token for a user. Production tokens come from the auth
/// subsystem; this mirrors its claim layout for tests and local tooling.
pub fn generate_token(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.as_str().to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

/// Verify and decode a bearer token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::DecodingFailed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key";

        let token = generate_token(user_id, UserRole::Issuer, secret, 900).unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, secret).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.user_role().unwrap(), UserRole::Issuer);
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", "test-secret-key");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_token(Uuid::new_v4(), UserRole::Blogger, "secret1", 900).unwrap();
        assert!(verify_token(&token, "secret2").is_err());
    }

    #[test]
    fn test_unknown_role_claim() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "AUDITOR".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(claims.user_role().is_err());
    }
}
