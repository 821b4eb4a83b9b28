//! REST API layer for HTTP request/response handling.
//!
//! Translates HTTP requests into core operations and maps [`crate::AppError`]
//! onto status codes. Holds no business rules of its own.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request processing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
