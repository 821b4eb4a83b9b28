//! Datastore capability consumed by the core.
//!
//! The core never caches state between calls; the implementation behind
//! [`UrlRepository`] is the sole authority for existence and uniqueness.
//!
//! # Implementations
//!
//! - `crate::infrastructure::persistence::PgUrlRepository` - PostgreSQL
//! - `crate::infrastructure::persistence::InMemoryUrlRepository` - sharded in-process map
//! - Mock implementations are auto-generated via `mockall` for testing

pub mod url_repository;

pub use url_repository::{StoreError, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
