//! In-memory implementation of the short code repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::{StoreError, UrlRepository};

/// In-memory repository backed by a sharded `DashMap`.
///
/// Insert-if-absent uses the entry API and increments mutate under the
/// shard write lock, so both are atomic with respect to other callers.
/// Data lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    records: DashMap<String, ShortenedUrl>,
    last_id: AtomicI64,
}

impl InMemoryUrlRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn insert_if_absent(&self, new_url: NewShortenedUrl) -> Result<ShortenedUrl, StoreError> {
        match self.records.entry(new_url.short_code) {
            Entry::Occupied(entry) => Err(StoreError::UniqueViolation {
                short_code: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let now = Utc::now();
                let record = ShortenedUrl::new(
                    self.last_id.fetch_add(1, Ordering::Relaxed) + 1,
                    new_url.url,
                    entry.key().clone(),
                    0,
                    now,
                    now,
                );
                entry.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn increment_access_count(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortenedUrl>, StoreError> {
        Ok(self.records.get_mut(short_code).map(|mut record| {
            record.access_count += 1;
            record.updated_at = Utc::now();
            record.value().clone()
        }))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<ShortenedUrl>, StoreError> {
        Ok(self.records.get(short_code).map(|record| record.value().clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_url(code: &str, url: &str) -> NewShortenedUrl {
        NewShortenedUrl {
            url: url.to_string(),
            short_code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUrlRepository::new();

        let created = repo
            .insert_if_absent(new_url("abc123", "https://example.com"))
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.access_count, 0);

        let found = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_insert_duplicate_code_is_rejected() {
        let repo = InMemoryUrlRepository::new();

        repo.insert_if_absent(new_url("abc123", "https://one.example"))
            .await
            .unwrap();

        let result = repo
            .insert_if_absent(new_url("abc123", "https://two.example"))
            .await;

        assert_eq!(
            result.unwrap_err(),
            StoreError::UniqueViolation {
                short_code: "abc123".to_string()
            }
        );

        let kept = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(kept.url, "https://one.example");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let repo = InMemoryUrlRepository::new();

        repo.insert_if_absent(new_url("AbC123", "https://one.example"))
            .await
            .unwrap();
        repo.insert_if_absent(new_url("abc123", "https://two.example"))
            .await
            .unwrap();

        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_increment_returns_new_value() {
        let repo = InMemoryUrlRepository::new();
        let created = repo
            .insert_if_absent(new_url("abc123", "https://example.com"))
            .await
            .unwrap();

        let first = repo.increment_access_count("abc123").await.unwrap().unwrap();
        let second = repo.increment_access_count("abc123").await.unwrap().unwrap();

        assert_eq!(first.access_count, 1);
        assert_eq!(second.access_count, 2);
        assert!(second.updated_at >= created.updated_at);
        assert_eq!(second.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_increment_missing_code() {
        let repo = InMemoryUrlRepository::new();

        assert!(repo.increment_access_count("nope").await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(InMemoryUrlRepository::new());
        repo.insert_if_absent(new_url("hot", "https://example.com"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..64)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_access_count("hot").await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let record = repo.find_by_code("hot").await.unwrap().unwrap();
        assert_eq!(record.access_count, 64);
    }
}
