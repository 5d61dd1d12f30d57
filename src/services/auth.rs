//! Session tokens and password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::UserClaims,
};

/// Why a token was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let message = match err {
            TokenError::Expired => "Token expired",
            TokenError::InvalidSignature | TokenError::Malformed => "Invalid token",
        };
        AppError::Authentication(message.to_string())
    }
}

/// Issues and validates HS256 session tokens
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: Duration::hours(config.jwt_expiration_hours as i64),
        }
    }

    /// Issue a token binding the user id and display name
    pub fn issue_token(&self, user_id: i32, display_name: &str) -> AppResult<String> {
        self.encode(&UserClaims::new(user_id, display_name, self.ttl))
    }

    pub fn encode(&self, claims: &UserClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn validate_token(&self, token: &str) -> Result<UserClaims, TokenError> {
        decode::<UserClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_expiration_hours: 12,
        })
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service("test-secret");
        let token = auth.issue_token(42, "Ada Lovelace").unwrap();
        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.name, "Ada Lovelace");
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
    }

    #[test]
    fn test_expired_token() {
        let auth = service("test-secret");
        let claims = UserClaims::new(42, "Ada", Duration::seconds(-60));
        let token = auth.encode(&claims).unwrap();
        assert_eq!(auth.validate_token(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = service("one-secret").issue_token(1, "Ada").unwrap();
        assert_eq!(
            service("other-secret").validate_token(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_token() {
        let auth = service("test-secret");
        assert_eq!(auth.validate_token("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(auth.validate_token(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_token_errors_are_generic() {
        let err: AppError = TokenError::InvalidSignature.into();
        assert_eq!(err.to_string(), "Authentication failed: Invalid token");
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
    }
}
