//! Validation of caller-supplied URLs before allocation.
//!
//! URLs are stored exactly as supplied (after trimming surrounding
//! whitespace). Validation only decides whether they are acceptable.

use url::Url;

/// Maximum accepted URL length in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters (got {0})")]
    TooLong(usize),

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters")]
    ControlCharacter,
}

/// Validates a URL and returns it trimmed.
///
/// # Rules
///
/// 1. Must be non-empty after trimming
/// 2. At most [`MAX_URL_LENGTH`] characters
/// 3. No control characters (the parser drops tabs and newlines silently)
/// 4. Must parse as an absolute URL
/// 5. Scheme must be `http`, `https`, `ftp` or `ftps`
/// 6. Must have a host
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com/page ").unwrap(), "https://example.com/page");
/// assert!(validate_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let length = trimmed.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(length));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" | "ftp" | "ftps" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}
