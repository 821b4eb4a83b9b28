//! Application error type crossing the core boundary.
//!
//! Only [`AppError::InvalidInput`], [`AppError::NotFound`] and
//! [`AppError::AllocationExhausted`] are produced by the allocation and
//! resolution logic itself. [`AppError::Unavailable`] and [`AppError::Internal`]
//! report datastore trouble. Datastore collisions never reach this type; they
//! are absorbed by the allocation retry loop.
//!
//! Every variant maps to an HTTP status through [`IntoResponse`]:
//!
//! | Variant               | Status |
//! |-----------------------|--------|
//! | `InvalidInput`        | 400    |
//! | `NotFound`            | 404    |
//! | `AllocationExhausted` | 503    |
//! | `Unavailable`         | 503    |
//! | `Internal`            | 500    |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or too-long URL, out-of-range code length or attempt budget.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// No record exists for the requested short code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The allocation retry budget ran out before a free code was found.
    #[error("{message}")]
    AllocationExhausted { message: String, details: Value },

    /// The datastore failed or did not answer in time.
    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn allocation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::AllocationExhausted {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput { .. } => "invalid_input",
            AppError::NotFound { .. } => "not_found",
            AppError::AllocationExhausted { .. } => "allocation_exhausted",
            AppError::Unavailable { .. } => "unavailable",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AllocationExhausted { .. } | AppError::Unavailable { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable form.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::InvalidInput { message, details }
            | AppError::NotFound { message, details }
            | AppError::AllocationExhausted { message, details }
            | AppError::Unavailable { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Datastore error");
        match err {
            StoreError::Timeout => AppError::unavailable("Datastore timed out", json!({})),
            StoreError::UniqueViolation { short_code } => AppError::internal(
                "Unexpected unique constraint violation",
                json!({ "short_code": short_code }),
            ),
            StoreError::Backend(_) => AppError::unavailable("Datastore error", json!({})),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::invalid_input("Validation failed", json!(errors.field_errors()))
    }
}
