#![allow(dead_code)]

use axum_test::TestServer;
use shortener::application::services::{AllocationPolicy, ShortenerService};
use shortener::domain::entities::ShortenedUrl;
use shortener::domain::repositories::UrlRepository;
use shortener::domain::{CodeGenerator, ReservedWords};
use shortener::infrastructure::persistence::InMemoryUrlRepository;
use shortener::routes::router;
use shortener::state::AppState;
use std::sync::Arc;

pub fn create_test_service(
    repo: Arc<InMemoryUrlRepository>,
    reserved_words: ReservedWords,
    policy: AllocationPolicy,
) -> ShortenerService {
    let repository: Arc<dyn UrlRepository> = repo;
    ShortenerService::new(repository, reserved_words, policy)
}

pub fn create_test_state() -> (AppState, Arc<InMemoryUrlRepository>) {
    let repo = Arc::new(InMemoryUrlRepository::new());
    let service = create_test_service(
        repo.clone(),
        ReservedWords::default(),
        AllocationPolicy::default(),
    );

    (AppState::new(Arc::new(service)), repo)
}

/// State whose generator can only ever draw from `alphabet`.
pub fn create_restricted_state(
    alphabet: &str,
    reserved_words: ReservedWords,
    policy: AllocationPolicy,
) -> AppState {
    let repo = Arc::new(InMemoryUrlRepository::new());
    let service = create_test_service(repo, reserved_words, policy)
        .with_generator(CodeGenerator::with_alphabet(alphabet).unwrap());

    AppState::new(Arc::new(service))
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_test_record(state: &AppState, url: &str) -> ShortenedUrl {
    state.shortener_service.allocate(url).await.unwrap()
}
