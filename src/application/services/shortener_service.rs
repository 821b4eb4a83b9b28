//! Short code allocation and resolution service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::code_generator::{CodeGenerator, DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH};
use crate::domain::entities::{NewShortenedUrl, ShortenedUrl};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::domain::reserved_words::ReservedWords;
use crate::error::AppError;
use crate::utils::url_validator::validate_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default deadline for a single datastore call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for allocation and datastore calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Symbols per generated code.
    pub code_length: usize,
    /// Candidates tried per allocation, counting reserved-word rejections
    /// and datastore collisions against the same budget.
    pub max_attempts: u32,
    /// Deadline applied to each datastore call.
    pub store_timeout: Duration,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

/// Service owning the three core operations: allocate, resolve and peek.
///
/// Holds no mutable state. Uniqueness is enforced by the datastore's
/// insert-if-absent primitive and counting by its atomic increment, so any
/// number of callers may share one instance.
pub struct ShortenerService<R: UrlRepository + ?Sized = dyn UrlRepository> {
    repository: Arc<R>,
    generator: CodeGenerator,
    reserved_words: ReservedWords,
    policy: AllocationPolicy,
}

impl<R: UrlRepository + ?Sized> ShortenerService<R> {
    /// Creates a service over the default 62-symbol alphabet.
    pub fn new(repository: Arc<R>, reserved_words: ReservedWords, policy: AllocationPolicy) -> Self {
        Self {
            repository,
            generator: CodeGenerator::new(),
            reserved_words,
            policy,
        }
    }

    /// Replaces the code generator.
    pub fn with_generator(mut self, generator: CodeGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn reserved_words(&self) -> &ReservedWords {
        &self.reserved_words
    }

    /// Allocates a short code for `url` using the configured policy.
    ///
    /// # Errors
    ///
    /// See [`Self::allocate_with`].
    pub async fn allocate(&self, url: &str) -> Result<ShortenedUrl, AppError> {
        self.allocate_with(url, self.policy.code_length, self.policy.max_attempts)
            .await
    }

    /// Allocates a short code of `code_length` symbols for `url`.
    ///
    /// # Algorithm
    ///
    /// Each attempt draws a fresh candidate. Reserved candidates are dropped
    /// without touching the datastore. Otherwise an insert-if-absent is
    /// issued; a uniqueness violation or a timeout moves on to the next
    /// attempt. All of these share the `max_attempts` budget.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] if:
    /// - URL is empty, longer than 2048 characters or malformed
    /// - `code_length` is outside `1..=10`
    /// - `max_attempts` is zero
    ///
    /// Returns [`AppError::AllocationExhausted`] when every attempt failed.
    ///
    /// Returns [`AppError::Unavailable`] on any other datastore failure.
    pub async fn allocate_with(
        &self,
        url: &str,
        code_length: usize,
        max_attempts: u32,
    ) -> Result<ShortenedUrl, AppError> {
        let url = validate_url(url).map_err(|e| {
            AppError::invalid_input("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if !(1..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(AppError::invalid_input(
                format!("Code length must be between 1 and {MAX_CODE_LENGTH}"),
                json!({ "code_length": code_length }),
            ));
        }

        if max_attempts == 0 {
            return Err(AppError::invalid_input(
                "Max attempts must be at least 1",
                json!({ "max_attempts": max_attempts }),
            ));
        }

        for attempt in 1..=max_attempts {
            let short_code = self.generator.generate(code_length);

            if self.reserved_words.is_reserved(&short_code) {
                debug!(attempt, %short_code, "Rejected reserved candidate");
                metrics::counter!("shortener_reserved_rejections_total").increment(1);
                continue;
            }

            let new_url = NewShortenedUrl {
                url: url.clone(),
                short_code,
            };

            match self
                .with_timeout(self.repository.insert_if_absent(new_url))
                .await
            {
                Ok(record) => {
                    info!(
                        short_code = %record.short_code,
                        attempts = attempt,
                        "Allocated short code"
                    );
                    metrics::counter!("shortener_allocations_total").increment(1);
                    return Ok(record);
                }
                Err(StoreError::UniqueViolation { short_code }) => {
                    debug!(attempt, %short_code, "Short code collision");
                    metrics::counter!("shortener_collisions_total").increment(1);
                }
                Err(StoreError::Timeout) => {
                    warn!(attempt, "Insert timed out");
                    metrics::counter!("shortener_store_timeouts_total").increment(1);
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(max_attempts, code_length, "Short code allocation exhausted");
        metrics::counter!("shortener_allocation_exhausted_total").increment(1);

        Err(AppError::allocation_exhausted(
            "Unable to generate a unique short code after maximum attempts",
            json!({ "max_attempts": max_attempts, "code_length": code_length }),
        ))
    }

    /// Resolves a short code, counting the access.
    ///
    /// The increment happens atomically at the datastore, which returns the
    /// post-increment record, so concurrent resolves never lose a count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    /// Returns [`AppError::Unavailable`] on datastore failure or timeout.
    pub async fn resolve(&self, short_code: &str) -> Result<ShortenedUrl, AppError> {
        let record = self
            .with_timeout(self.repository.increment_access_count(short_code))
            .await?
            .ok_or_else(|| not_found(short_code))?;

        debug!(
            short_code = %record.short_code,
            access_count = record.access_count,
            "Resolved short code"
        );
        metrics::counter!("shortener_resolves_total").increment(1);

        Ok(record)
    }

    /// Looks up a short code without counting the access.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    /// Returns [`AppError::Unavailable`] on datastore failure or timeout.
    pub async fn peek(&self, short_code: &str) -> Result<ShortenedUrl, AppError> {
        self.with_timeout(self.repository.find_by_code(short_code))
            .await?
            .ok_or_else(|| not_found(short_code))
    }

    /// Checks datastore connectivity.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.with_timeout(self.repository.ping()).await?;
        Ok(())
    }

    async fn with_timeout<T>(
        &self,
        operation: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.policy.store_timeout, operation)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }
}

fn not_found(short_code: &str) -> AppError {
    AppError::not_found("Short code not found", json!({ "short_code": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use async_trait::async_trait;
    use chrono::Utc;
    use mockall::Sequence;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn record(id: i64, code: &str, url: &str, access_count: i64) -> ShortenedUrl {
        let now = Utc::now();
        ShortenedUrl::new(id, url.to_string(), code.to_string(), access_count, now, now)
    }

    fn service(repo: MockUrlRepository) -> ShortenerService<MockUrlRepository> {
        ShortenerService::new(
            Arc::new(repo),
            ReservedWords::default(),
            AllocationPolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_allocate_success() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_insert_if_absent()
            .withf(|new_url| {
                new_url.url == "https://example.com/page"
                    && new_url.short_code.len() == 6
                    && new_url.short_code.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .times(1)
            .returning(|new_url| Ok(record(1, &new_url.short_code, &new_url.url, 0)));

        let result = service(mock_repo)
            .allocate("https://example.com/page")
            .await
            .unwrap();

        assert_eq!(result.url, "https://example.com/page");
        assert_eq!(result.short_code.len(), 6);
        assert_eq!(result.access_count, 0);
    }

    #[tokio::test]
    async fn test_allocate_custom_length() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_insert_if_absent()
            .withf(|new_url| new_url.short_code.len() == 10)
            .times(1)
            .returning(|new_url| Ok(record(1, &new_url.short_code, &new_url.url, 0)));

        let result = service(mock_repo)
            .allocate_with("https://example.com", 10, 5)
            .await;

        assert_eq!(result.unwrap().short_code.len(), 10);
    }

    #[tokio::test]
    async fn test_allocate_retries_on_collision() {
        let mut mock_repo = MockUrlRepository::new();
        let mut seq = Sequence::new();

        mock_repo
            .expect_insert_if_absent()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|new_url| {
                Err(StoreError::UniqueViolation {
                    short_code: new_url.short_code,
                })
            });
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_url| Ok(record(3, &new_url.short_code, &new_url.url, 0)));

        let result = service(mock_repo).allocate("https://example.com").await;

        assert_eq!(result.unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_allocate_exhausted_after_collisions() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_insert_if_absent()
            .times(3)
            .returning(|new_url| {
                Err(StoreError::UniqueViolation {
                    short_code: new_url.short_code,
                })
            });

        let result = service(mock_repo)
            .allocate_with("https://example.com", 6, 3)
            .await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_reserved_candidate_never_reaches_datastore() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenerService::new(
            Arc::new(mock_repo),
            ReservedWords::new(["aaa"]),
            AllocationPolicy::default(),
        )
        .with_generator(CodeGenerator::with_alphabet("a").unwrap());

        let result = service.allocate_with("https://example.com", 3, 1).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_reserved_rejections_share_attempt_budget() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenerService::new(
            Arc::new(mock_repo),
            ReservedWords::new(["AAA"]),
            AllocationPolicy::default(),
        )
        .with_generator(CodeGenerator::with_alphabet("a").unwrap());

        let result = service.allocate_with("https://example.com", 3, 50).await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::AllocationExhausted { .. }));
        assert_eq!(err.to_error_info().details["max_attempts"], 50);
    }

    #[tokio::test]
    async fn test_allocate_timeout_consumes_attempt() {
        let mut mock_repo = MockUrlRepository::new();
        let mut seq = Sequence::new();

        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::Timeout));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|new_url| Ok(record(9, &new_url.short_code, &new_url.url, 0)));

        let result = service(mock_repo)
            .allocate_with("https://example.com", 6, 2)
            .await;

        assert_eq!(result.unwrap().id, 9);
    }

    #[tokio::test]
    async fn test_allocate_backend_error_is_not_retried() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .returning(|_| Err(StoreError::Backend("connection reset".to_string())));

        let result = service(mock_repo).allocate("https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_allocate_invalid_url() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = service(mock_repo);

        for url in ["", "not-a-url", "javascript:alert(1)"] {
            let result = service.allocate(url).await;
            assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
        }
    }

    #[tokio::test]
    async fn test_allocate_url_too_long() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let url = format!("https://example.com/{}", "a".repeat(2048));
        let result = service(mock_repo).allocate(&url).await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_allocate_rejects_bad_parameters() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo.expect_insert_if_absent().times(0);

        let service = service(mock_repo);

        let zero_length = service.allocate_with("https://example.com", 0, 10).await;
        assert!(matches!(
            zero_length.unwrap_err(),
            AppError::InvalidInput { .. }
        ));

        let too_long = service.allocate_with("https://example.com", 11, 10).await;
        assert!(matches!(too_long.unwrap_err(), AppError::InvalidInput { .. }));

        let zero_attempts = service.allocate_with("https://example.com", 6, 0).await;
        assert!(matches!(
            zero_attempts.unwrap_err(),
            AppError::InvalidInput { .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_returns_post_increment_record() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_increment_access_count()
            .withf(|code| code == "aZ3k9Q")
            .times(1)
            .returning(|code| Ok(Some(record(1, code, "https://example.com/page", 1))));
        mock_repo.expect_find_by_code().times(0);

        let result = service(mock_repo).resolve("aZ3k9Q").await.unwrap();

        assert_eq!(result.short_code, "aZ3k9Q");
        assert_eq!(result.access_count, 1);
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_increment_access_count()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_insert_if_absent().times(0);

        let result = service(mock_repo).resolve("nope00").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_timeout_is_unavailable() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_increment_access_count()
            .times(1)
            .returning(|_| Err(StoreError::Timeout));

        let result = service(mock_repo).resolve("aZ3k9Q").await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_peek_does_not_increment() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_find_by_code()
            .withf(|code| code == "aZ3k9Q")
            .times(1)
            .returning(|code| Ok(Some(record(1, code, "https://example.com", 4))));
        mock_repo.expect_increment_access_count().times(0);

        let result = service(mock_repo).peek("aZ3k9Q").await.unwrap();

        assert_eq!(result.access_count, 4);
    }

    #[tokio::test]
    async fn test_peek_not_found() {
        let mut mock_repo = MockUrlRepository::new();

        mock_repo
            .expect_find_by_code()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(mock_repo).peek("nope00").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    /// Repository whose first `stalled_calls` writes hang past any deadline.
    struct StallingRepository {
        stalled_calls: u32,
        inserts: AtomicU32,
    }

    impl StallingRepository {
        fn new(stalled_calls: u32) -> Self {
            Self {
                stalled_calls,
                inserts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl UrlRepository for StallingRepository {
        async fn insert_if_absent(
            &self,
            new_url: NewShortenedUrl,
        ) -> Result<ShortenedUrl, StoreError> {
            let call = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.stalled_calls {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Ok(record(i64::from(call), &new_url.short_code, &new_url.url, 0))
        }

        async fn increment_access_count(
            &self,
            short_code: &str,
        ) -> Result<Option<ShortenedUrl>, StoreError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Some(record(1, short_code, "https://example.com", 1)))
        }

        async fn find_by_code(
            &self,
            _short_code: &str,
        ) -> Result<Option<ShortenedUrl>, StoreError> {
            Ok(None)
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn stalling_service(repo: Arc<StallingRepository>) -> ShortenerService<StallingRepository> {
        ShortenerService::new(
            repo,
            ReservedWords::empty(),
            AllocationPolicy {
                store_timeout: Duration::from_millis(50),
                ..AllocationPolicy::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_insert_spends_attempt_and_moves_on() {
        let repo = Arc::new(StallingRepository::new(2));
        let service = stalling_service(repo.clone());

        let result = service
            .allocate_with("https://example.com", 6, 3)
            .await
            .unwrap();

        assert_eq!(result.id, 3);
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_inserts_exhaust_budget() {
        let repo = Arc::new(StallingRepository::new(u32::MAX));
        let service = stalling_service(repo.clone());

        let result = service.allocate_with("https://example.com", 6, 4).await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::AllocationExhausted { .. }
        ));
        assert_eq!(repo.inserts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_resolve_is_unavailable() {
        let service = stalling_service(Arc::new(StallingRepository::new(0)));

        let result = service.resolve("aZ3k9Q").await;

        assert!(matches!(result.unwrap_err(), AppError::Unavailable { .. }));
    }
}
