//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, rents, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookrent API",
        version = "0.3.0",
        description = "Book lending REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::live,
        // Users
        users::sign_up,
        users::sign_in,
        users::get_user,
        users::update_profile,
        users::update_password,
        users::delete_account,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Rents
        rents::rent_books,
        rents::current_borrowed,
        rents::last_month,
        rents::mark_returned,
        rents::delete_rent,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::SignUp,
            crate::models::user::SignIn,
            crate::models::user::UpdateProfile,
            crate::models::user::UpdatePassword,
            users::TokenResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Rents
            crate::models::rent::RentalLine,
            crate::models::rent::RentRequest,
            crate::models::rent::RentReceipt,
            crate::models::rent::BorrowedBook,
            crate::services::rents::Reconciliation,
            // Common
            crate::api::IdResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "users", description = "Accounts and sessions"),
        (name = "books", description = "Book catalog"),
        (name = "rents", description = "Book rentals")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/live",
            "/users/sign-up",
            "/users/settings/profile",
            "/books/{id}",
            "/rents",
            "/rents/months",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }
}
