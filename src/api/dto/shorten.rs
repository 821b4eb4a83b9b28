//! DTOs for the shortening endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortenedUrl;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten. Length and format are checked after
    /// trimming by the service.
    #[validate(length(min = 1))]
    pub url: String,
}

/// Full view of a shortened URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenedUrlResponse {
    pub id: i64,
    pub url: String,
    pub short_code: String,
    pub access_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ShortenedUrl> for ShortenedUrlResponse {
    fn from(record: ShortenedUrl) -> Self {
        Self {
            id: record.id,
            url: record.url,
            short_code: record.short_code,
            access_count: record.access_count,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
