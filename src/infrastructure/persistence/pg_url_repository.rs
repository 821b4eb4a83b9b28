//! PostgreSQL implementation of the short code repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::{StoreError, UrlRepository};

/// Name of the unique constraint on `shortened_urls.short_code`.
const SHORT_CODE_CONSTRAINT: &str = "shortened_urls_short_code_key";

#[derive(sqlx::FromRow)]
struct ShortenedUrlRow {
    id: i64,
    url: String,
    short_code: String,
    access_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShortenedUrlRow> for ShortenedUrl {
    fn from(row: ShortenedUrlRow) -> Self {
        ShortenedUrl::new(
            row.id,
            row.url,
            row.short_code,
            row.access_count,
            row.created_at,
            row.updated_at,
        )
    }
}

/// PostgreSQL repository for short code mappings.
///
/// Uniqueness rests on the `short_code` unique constraint and counting on a
/// single `UPDATE .. RETURNING`, so no statement here needs a transaction.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation_on_code(err: &sqlx::Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(SHORT_CODE_CONSTRAINT))
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert_if_absent(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, StoreError> {
        let row = sqlx::query_as::<_, ShortenedUrlRow>(
            r#"
            INSERT INTO shortened_urls (url, short_code)
            VALUES ($1, $2)
            ON CONFLICT (short_code) DO NOTHING
            RETURNING id, url, short_code, access_count, created_at, updated_at
            "#,
        )
        .bind(&new_url.url)
        .bind(&new_url.short_code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_code(&e) {
                StoreError::UniqueViolation {
                    short_code: new_url.short_code.clone(),
                }
            } else {
                e.into()
            }
        })?;

        row.map(ShortenedUrl::from)
            .ok_or(StoreError::UniqueViolation {
                short_code: new_url.short_code,
            })
    }

    async fn increment_access_count(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortenedUrl>, StoreError> {
        let row = sqlx::query_as::<_, ShortenedUrlRow>(
            r#"
            UPDATE shortened_urls
            SET access_count = access_count + 1, updated_at = NOW()
            WHERE short_code = $1
            RETURNING id, url, short_code, access_count, created_at, updated_at
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortenedUrl::from))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortenedUrl>, StoreError> {
        let row = sqlx::query_as::<_, ShortenedUrlRow>(
            r#"
            SELECT id, url, short_code, access_count, created_at, updated_at
            FROM shortened_urls
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortenedUrl::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
