//! Rental endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::rent::{BorrowedBook, RentReceipt, RentRequest},
};

use super::{AuthenticatedUser, IdResponse};

/// Rent books for the signed-in user
///
/// Writes the rental history, then records a transaction with one item per
/// book. A failure response carries a `reconciliation` field describing what
/// was left persisted.
#[utoipa::path(
    post,
    path = "/rents",
    tag = "rents",
    security(("bearer_auth" = [])),
    request_body = RentRequest,
    responses(
        (status = 200, description = "Books rented", body = RentReceipt),
        (status = 400, description = "Invalid request or unknown book", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "User or book not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Transaction could not be recorded", body = crate::error::ErrorResponse)
    )
)]
pub async fn rent_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<RentRequest>,
) -> AppResult<Json<RentReceipt>> {
    let receipt = state
        .services
        .rents
        .rent_books(claims.user_id, request)
        .await?;
    Ok(Json(receipt))
}

/// Rentals not returned yet
#[utoipa::path(
    get,
    path = "/rents",
    tag = "rents",
    responses(
        (status = 200, description = "Currently borrowed books", body = Vec<BorrowedBook>)
    )
)]
pub async fn current_borrowed(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<BorrowedBook>>> {
    let rents = state.services.rents.current_borrowed().await?;
    Ok(Json(rents))
}

/// Rentals issued during the last 30 days and not returned yet
#[utoipa::path(
    get,
    path = "/rents/months",
    tag = "rents",
    responses(
        (status = 200, description = "Recent rentals", body = Vec<BorrowedBook>)
    )
)]
pub async fn last_month(State(state): State<crate::AppState>) -> AppResult<Json<Vec<BorrowedBook>>> {
    let rents = state.services.rents.last_month().await?;
    Ok(Json(rents))
}

#[utoipa::path(
    patch,
    path = "/rents/{id}",
    tag = "rents",
    params(
        ("id" = i32, Path, description = "Rental history ID")
    ),
    responses(
        (status = 200, description = "Marked as returned", body = IdResponse),
        (status = 404, description = "Rental not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already returned", body = crate::error::ErrorResponse)
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<IdResponse>> {
    let id = state.services.rents.mark_returned(id).await?;
    tracing::info!(rent_id = id, "Book returned");
    Ok(Json(IdResponse { id }))
}

#[utoipa::path(
    delete,
    path = "/rents/{id}",
    tag = "rents",
    params(
        ("id" = i32, Path, description = "Rental history ID")
    ),
    responses(
        (status = 200, description = "Rental deleted", body = IdResponse),
        (status = 404, description = "Rental not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_rent(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<IdResponse>> {
    let id = state.services.rents.delete(id).await?;
    tracing::info!(rent_id = id, "Rental deleted");
    Ok(Json(IdResponse { id }))
}
