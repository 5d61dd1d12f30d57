//! Transaction service endpoints

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    error::AppResult,
    models::transaction::{CreateTransaction, CreateTransactionItem, Created, TransactionDetails},
    TransactionState,
};

use super::health;

/// Open a transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransaction,
    responses(
        (status = 200, description = "Transaction created", body = Created),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_transaction(
    State(state): State<TransactionState>,
    Json(request): Json<CreateTransaction>,
) -> AppResult<Json<Created>> {
    let id = state.transactions.create(request).await?;
    Ok(Json(Created { id }))
}

/// Add a line item to an existing transaction
#[utoipa::path(
    post,
    path = "/transactions/items",
    tag = "transactions",
    request_body = CreateTransactionItem,
    responses(
        (status = 200, description = "Item added", body = Created),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Transaction not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_transaction_item(
    State(state): State<TransactionState>,
    Json(item): Json<CreateTransactionItem>,
) -> AppResult<Json<Created>> {
    let id = state.transactions.add_item(item).await?;
    Ok(Json(Created { id }))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "transactions",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction with its items", body = TransactionDetails),
        (status = 404, description = "Transaction not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_transaction(
    State(state): State<TransactionState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TransactionDetails>> {
    let details = state.transactions.get(id).await?;
    Ok(Json(details))
}

/// Delete a transaction and its items
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "transactions",
    params(
        ("id" = i64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(state): State<TransactionState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.transactions.delete(id).await?;
    Ok(StatusCode::OK)
}

/// Create the transaction service router
pub fn router(state: TransactionState, timeout: Duration) -> Router {
    let api_v1 = Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions/items", post(create_transaction_item))
        .route(
            "/transactions/:id",
            get(get_transaction).delete(delete_transaction),
        )
        .with_state(state);

    Router::new()
        .route("/live", get(health::live))
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
}
