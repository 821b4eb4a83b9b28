//! Domain layer: entities, the datastore capability, and short code rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Datastore trait implemented by the infrastructure layer
//! - [`code_generator`] - Random candidate codes from an alphabet
//! - [`reserved_words`] - Vocabulary that may never be allocated
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - No in-process shared mutable state; correctness of allocation and counting
//!   is delegated to the datastore's atomic primitives
//! - Orchestration lives in [`crate::application::services`]

pub mod code_generator;
pub mod entities;
pub mod repositories;
pub mod reserved_words;

pub use code_generator::CodeGenerator;
pub use reserved_words::ReservedWords;
