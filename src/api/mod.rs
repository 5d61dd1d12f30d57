//! API handlers for the Bookrent REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod rents;
pub mod transactions;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("Invalid authorization header format".to_string())
            })?;

        let claims = state.services.auth.validate_token(token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Id of the affected record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdResponse {
    pub id: i32,
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the library service router with all routes
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    let api_v1 = Router::new()
        // Users
        .route("/users/sign-up", post(users::sign_up))
        .route("/users/sign-in", post(users::sign_in))
        .route("/users/:id", get(users::get_user))
        .route(
            "/users/settings/profile",
            patch(users::update_profile).delete(users::delete_account),
        )
        .route("/users/settings/password", patch(users::update_password))
        // Books
        .route("/books", post(books::create_book).get(books::list_books))
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        // Rents
        .route("/rents", post(rents::rent_books).get(rents::current_borrowed))
        .route("/rents/months", get(rents::last_month))
        .route(
            "/rents/:id",
            patch(rents::mark_returned).delete(rents::delete_rent),
        )
        .with_state(state);

    Router::new()
        .route("/live", get(health::live))
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
}
