//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// Every successful call adds exactly one to the record's `access_count`
/// before the redirect is sent.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the stored URL cannot be used as a `Location` header.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.shortener_service.resolve(&short_code).await?;

    debug!(
        short_code = %record.short_code,
        access_count = record.access_count,
        "Redirecting"
    );

    let location = HeaderValue::from_str(&record.url).map_err(|e| {
        error!(
            short_code = %record.short_code,
            error = %e,
            "Stored URL is not a valid header value"
        );
        AppError::internal(
            "Stored URL cannot be redirected to",
            json!({ "short_code": record.short_code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
