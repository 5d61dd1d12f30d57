//! Account endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{SignIn, SignUp, UpdatePassword, UpdateProfile, User},
};

use super::{AuthenticatedUser, IdResponse};

/// Session token issued on sign-in
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/users/sign-up",
    tag = "users",
    request_body = SignUp,
    responses(
        (status = 200, description = "Account created", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<crate::AppState>,
    Json(request): Json<SignUp>,
) -> AppResult<Json<User>> {
    let user = state.services.users.sign_up(request).await?;
    Ok(Json(user))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/users/sign-in",
    tag = "users",
    request_body = SignIn,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<crate::AppState>,
    Json(request): Json<SignIn>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.users.sign_in(request).await?;
    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_by_id(id).await?;
    Ok(Json(user))
}

/// Change the display name of the signed-in user
#[utoipa::path(
    patch,
    path = "/users/settings/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = IdResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateProfile>,
) -> AppResult<Json<IdResponse>> {
    let id = state
        .services
        .users
        .update_profile(claims.user_id, request)
        .await?;
    Ok(Json(IdResponse { id }))
}

#[utoipa::path(
    patch,
    path = "/users/settings/password",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdatePassword,
    responses(
        (status = 200, description = "Password changed", body = IdResponse),
        (status = 400, description = "Invalid input or wrong current password", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_password(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdatePassword>,
) -> AppResult<Json<IdResponse>> {
    let id = state
        .services
        .users
        .update_password(claims.user_id, request)
        .await?;
    tracing::info!(user_id = id, "Password changed");
    Ok(Json(IdResponse { id }))
}

/// Delete the signed-in user's account
#[utoipa::path(
    delete,
    path = "/users/settings/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = IdResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Account no longer exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<IdResponse>> {
    let id = state.services.users.delete_account(claims.user_id).await?;
    tracing::info!(user_id = id, "Account deleted");
    Ok(Json(IdResponse { id }))
}
