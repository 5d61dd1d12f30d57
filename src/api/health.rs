//! Liveness endpoint

use axum::http::StatusCode;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 204, description = "Service is alive")
    )
)]
pub async fn live() -> StatusCode {
    StatusCode::NO_CONTENT
}
