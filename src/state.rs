//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenerService;

#[derive(Clone)]
pub struct AppState {
    pub shortener_service: Arc<ShortenerService>,
}

impl AppState {
    pub fn new(shortener_service: Arc<ShortenerService>) -> Self {
        Self { shortener_service }
    }
}
