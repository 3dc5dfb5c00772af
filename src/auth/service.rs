//! Authentication service
//!
//! Holds the verification secret and resolves bearer tokens into
//! authenticated identities. Token issuance lives in the identity
//! subsystem; this service only verifies.

use uuid::Uuid;

use crate::models::UserRole;

use super::jwt::{verify_token, JwtError};

/// Identity extracted from a verified bearer token
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Verifies bearer tokens against the configured secret
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Verify a token and return the identity it carries
    pub fn authenticate(&self, token: &str) -> Result<TokenIdentity, JwtError> {
        let claims = verify_token(token, &self.jwt_secret)?;
        Ok(TokenIdentity {
            user_id: claims.user_id()?,
            role: claims.user_role()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::jwt::generate_token;
    use super::*;

    #[test]
    fn test_authenticate_valid_token() {
        let service = AuthService::new("unit-test-secret".to_string());
        let user_id = Uuid::new_v4();
        let token = generate_token(user_id, UserRole::Admin, "unit-test-secret", 900).unwrap();

        let identity = service.authenticate(&token).unwrap();
        assert_eq!(identity.user_id, user_id);
        assert_eq!(identity.role, UserRole::Admin);
    }

    #[test]
    fn test_authenticate_rejects_garbage() {
        let service = AuthService::new("unit-test-secret".to_string());
        assert!(service.authenticate("not-a-token").is_err());
    }
}
