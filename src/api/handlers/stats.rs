//! Handler for access statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::UrlStatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Retrieves access statistics for a short code.
///
/// # Endpoint
///
/// `GET /api/shorten/{short_code}/stats`
///
/// Reading statistics never changes `access_count`.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<UrlStatsResponse>, AppError> {
    let record = state.shortener_service.peek(&short_code).await?;

    Ok(Json(record.into()))
}
