//! Authentication service implementation
//!
//! This service handles credential verification for the admin CMS and
//! issues the bearer tokens used by the admin API and the OTP-gated
//! booking manage flow.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::models::user::User;
use crate::utils::errors::{Result, TourbookError};

/// Claims carried by every Tourbook bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id for login tokens, booking id for manage tokens
    pub sub: i64,
    /// "admin", "customer", or "booking" for manage tokens
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication service for credentials and tokens
#[derive(Debug, Clone)]
pub struct AuthService {
    config: AuthConfig,
}

pub const ROLE_BOOKING_MANAGE: &str = "booking";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Generate a random salt encoded as hex
    pub fn generate_salt() -> String {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Salted SHA-256 digest of a password, hex encoded
    pub fn hash_password(password: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a candidate password against a stored user
    pub fn verify_password(&self, user: &User, password: &str) -> bool {
        let candidate = Self::hash_password(password, &user.password_salt);
        // Constant-time comparison over the hex digests
        candidate.len() == user.password_hash.len()
            && candidate
                .bytes()
                .zip(user.password_hash.bytes())
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    /// Issue a login token for a user
    pub fn issue_token(&self, user: &User) -> Result<String> {
        self.issue_with_role(user.id, &user.role, self.config.token_ttl_minutes)
    }

    /// Issue a short-lived manage token scoped to one booking
    pub fn issue_manage_token(&self, booking_id: i64) -> Result<String> {
        self.issue_with_role(
            booking_id,
            ROLE_BOOKING_MANAGE,
            self.config.manage_token_ttl_minutes,
        )
    }

    fn issue_with_role(&self, sub: i64, role: &str, ttl_minutes: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub,
            role: role.to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )?;

        debug!(sub = sub, role = role, "Issued bearer token");
        Ok(token)
    }

    /// Validate a bearer token and return its claims
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!(error = %e, "Token validation failed");
            TourbookError::Authentication("Invalid or expired token".to_string())
        })?;

        Ok(data.claims)
    }

    /// Validate a manage token and check it grants access to `booking_id`
    pub fn verify_manage_token(&self, token: &str, booking_id: i64) -> Result<()> {
        let claims = self.verify_token(token)?;
        if claims.role != ROLE_BOOKING_MANAGE || claims.sub != booking_id {
            return Err(TourbookError::PermissionDenied(
                "Token does not grant access to this booking".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn auth() -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_ttl_minutes: 60,
            manage_token_ttl_minutes: 30,
        })
    }

    fn user_with_password(password: &str) -> User {
        let salt = AuthService::generate_salt();
        User {
            id: 42,
            email: "admin@example.com".to_string(),
            password_hash: AuthService::hash_password(password, &salt),
            password_salt: salt,
            full_name: "Admin".to_string(),
            role: "admin".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_round_trip() {
        let auth = auth();
        let user = user_with_password("hunter22");
        assert!(auth.verify_password(&user, "hunter22"));
        assert!(!auth.verify_password(&user, "hunter23"));
    }

    #[test]
    fn test_salt_uniqueness() {
        assert_ne!(AuthService::generate_salt(), AuthService::generate_salt());
    }

    #[test]
    fn test_token_round_trip() {
        let auth = auth();
        let user = user_with_password("pw");
        let token = auth.issue_token(&user).unwrap();
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_manage_token_scoping() {
        let auth = auth();
        let token = auth.issue_manage_token(7).unwrap();
        assert!(auth.verify_manage_token(&token, 7).is_ok());
        assert!(auth.verify_manage_token(&token, 8).is_err());

        // A login token must not pass as a manage token
        let login = auth.issue_token(&user_with_password("pw")).unwrap();
        assert!(auth.verify_manage_token(&login, 42).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = auth();
        let token = auth.issue_manage_token(7).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(auth.verify_token(&tampered).is_err());
    }
}
