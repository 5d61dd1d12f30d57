//! Account management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{SignIn, SignUp, UpdatePassword, UpdateProfile, User},
    repository::Repository,
};

use super::auth::{hash_password, verify_password, AuthService};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    auth: AuthService,
}

impl UsersService {
    pub fn new(repository: Repository, auth: AuthService) -> Self {
        Self { repository, auth }
    }

    /// Register a new account
    pub async fn sign_up(&self, request: SignUp) -> AppResult<User> {
        request.validate()?;

        let full_name = request.full_name.trim();
        let email = request.email.trim().to_lowercase();
        let password_hash = hash_password(&request.password)?;

        let user = self
            .repository
            .users
            .create(full_name, &email, &password_hash)
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a session token
    pub async fn sign_in(&self, request: SignIn) -> AppResult<String> {
        request.validate()?;

        let user = self
            .repository
            .users
            .get_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        self.auth.issue_token(user.id, &user.full_name)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn update_profile(&self, user_id: i32, request: UpdateProfile) -> AppResult<i32> {
        request.validate()?;
        self.repository
            .users
            .update_full_name(user_id, request.full_name.trim())
            .await
    }

    /// Change password after checking the current one
    pub async fn update_password(&self, user_id: i32, request: UpdatePassword) -> AppResult<i32> {
        request.validate()?;

        let user = self.repository.users.get_by_id(user_id).await?;
        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AppError::Validation("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(&request.new_password)?;
        self.repository.users.update_password(user_id, &password_hash).await
    }

    pub async fn delete_account(&self, user_id: i32) -> AppResult<i32> {
        self.repository.users.delete(user_id).await?;
        Ok(user_id)
    }
}
