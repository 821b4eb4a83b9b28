//! Infrastructure layer for external integrations.
//!
//! Implements the datastore capability defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod persistence;
