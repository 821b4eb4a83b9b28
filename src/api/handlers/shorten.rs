//! Handlers for creating and inspecting short codes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenedUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Allocates a short code for a URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "id": 1,
///   "url": "https://example.com/page",
///   "short_code": "aZ3k9Q",
///   "access_count": 0,
///   "created_at": "2025-01-01T00:00:00Z",
///   "updated_at": "2025-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing, too long or malformed.
/// Returns 503 Service Unavailable if no free code was found within the
/// attempt budget or the datastore is down.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenedUrlResponse>), AppError> {
    payload.validate()?;

    let record = state.shortener_service.allocate(&payload.url).await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Returns a mapping without counting an access.
///
/// # Endpoint
///
/// `GET /api/shorten/{short_code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<ShortenedUrlResponse>, AppError> {
    let record = state.shortener_service.peek(&short_code).await?;

    Ok(Json(record.into()))
}
