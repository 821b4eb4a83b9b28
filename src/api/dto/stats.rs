//! DTOs for access statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortenedUrl;

/// Access statistics for a short code.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlStatsResponse {
    pub id: i64,
    pub url: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortenedUrl> for UrlStatsResponse {
    fn from(record: ShortenedUrl) -> Self {
        Self {
            id: record.id,
            url: record.url,
            access_count: record.access_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
