//! Repository trait for short code mappings.

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use async_trait::async_trait;

/// Failures reported by a datastore.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A record with the same short code already exists.
    #[error("short code already exists: {short_code}")]
    UniqueViolation { short_code: String },

    /// The datastore did not answer within the configured deadline.
    #[error("datastore operation timed out")]
    Timeout,

    #[error("datastore error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Storage interface for short code mappings.
///
/// Every method is a single transaction boundary at the datastore. None of
/// them may be emulated with separate read and write round-trips.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts the mapping only if no record holds the same short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if the short code is taken.
    async fn insert_if_absent(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, StoreError>;

    /// Atomically adds one to `access_count` and bumps `updated_at`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` with the post-increment state
    /// - `Ok(None)` if no record has this short code
    async fn increment_access_count(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortenedUrl>, StoreError>;

    /// Looks up a record without side effects.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortenedUrl>, StoreError>;

    /// Checks that the datastore is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
