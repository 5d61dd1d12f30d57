//! User model and related types

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Sign-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignUp {
    #[validate(length(min = 3, max = 50, message = "Full name must be 3 to 50 characters"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, max = 50, message = "Password must be 6 to 50 characters"))]
    pub password: String,
}

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignIn {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Update own display name
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 3, max = 50, message = "Full name must be 3 to 50 characters"))]
    pub full_name: String,
}

/// Change own password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePassword {
    pub current_password: String,
    #[validate(length(min = 6, max = 50, message = "Password must be 6 to 50 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub new_password_repeat: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    /// Display name at the time the token was issued
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims valid for `ttl` starting now
    pub fn new(user_id: i32, name: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            user_id,
            name: name.into(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_sign_up_validation() {
        let bad = SignUp {
            full_name: "Al".to_string(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("full_name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_password_repeat_must_match() {
        let req = UpdatePassword {
            current_password: "old-secret".to_string(),
            new_password: "new-secret".to_string(),
            new_password_repeat: "other-secret".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_claims_expiry() {
        let claims = UserClaims::new(5, "Ada", Duration::hours(12));
        assert_eq!(claims.exp - claims.iat, 12 * 3600);
        assert_eq!(claims.sub, "5");
    }
}
