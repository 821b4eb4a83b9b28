//! Utility functions shared across layers.
//!
//! - [`url_validator`] - Validation of caller-supplied URLs

pub mod url_validator;
