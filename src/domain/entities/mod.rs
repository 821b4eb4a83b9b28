//! Core domain entities.
//!
//! - [`ShortenedUrl`] - A persisted mapping from a short code to its original URL
//! - [`NewShortenedUrl`] - Input for creating a mapping
//!
//! Records are created only through allocation and mutated only by the
//! access counter; there is no update or delete path.

pub mod shortened_url;

pub use shortened_url::{NewShortenedUrl, ShortenedUrl};
