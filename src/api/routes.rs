//! API route configuration.

use crate::api::handlers::{retrieve_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST /shorten`                    - Allocate a short code for a URL
/// - `GET  /shorten/{short_code}`       - Inspect a mapping (does not count)
/// - `GET  /shorten/{short_code}/stats` - Access statistics (does not count)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/{short_code}", get(retrieve_handler))
        .route("/shorten/{short_code}/stats", get(stats_handler))
}
