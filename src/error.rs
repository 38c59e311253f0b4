//! Application error type shared by the core, the storage backends and the HTTP layer.
//!
//! Every fallible operation in the crate returns [`AppError`]. The HTTP layer turns it
//! into a JSON error body through [`IntoResponse`]; binaries wrap it in `anyhow`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by link creation, resolution and storage.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted URL could not be normalized into an allowed absolute URL.
    #[error("Invalid URL: {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The destination points back at this service.
    #[error("URL points to this service: {url}")]
    SelfReferential { url: String },

    /// A link with this code already exists.
    ///
    /// Recovered inside the shortener; never returned to callers of `shorten`.
    #[error("Short code already exists: {code}")]
    DuplicateCode { code: String },

    /// No free code was found within the configured number of attempts.
    #[error("Failed to generate a unique code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// The store holds no link with this code.
    #[error("Link not found: {code}")]
    NotFound { code: String },

    /// A short code was requested that does not map to any link.
    #[error("Unknown short code: {code}")]
    UnknownCode { code: String },

    /// The link exists but its expiry time has passed.
    #[error("Link has expired: {code}")]
    LinkExpired { code: String },

    /// Request payload failed validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn unknown_code(code: impl Into<String>) -> Self {
        Self::UnknownCode { code: code.into() }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. } | Self::SelfReferential { .. } | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } | Self::UnknownCode { .. } => StatusCode::NOT_FOUND,
            Self::LinkExpired { .. } => StatusCode::GONE,
            Self::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::DuplicateCode { .. } | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the body sent to API clients.
    ///
    /// Storage and internal failures are reported generically; their detail stays in the logs.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            Self::InvalidUrl { input, reason } => (
                "invalid_url",
                "Invalid URL".to_string(),
                json!({ "url": input, "reason": reason }),
            ),
            Self::SelfReferential { url } => (
                "self_referential",
                "URL points to this service".to_string(),
                json!({ "url": url }),
            ),
            Self::GenerationExhausted { attempts } => (
                "generation_exhausted",
                "Could not allocate a short code, try again later".to_string(),
                json!({ "attempts": attempts }),
            ),
            Self::NotFound { code } | Self::UnknownCode { code } => (
                "not_found",
                "Short link not found".to_string(),
                json!({ "code": code }),
            ),
            Self::LinkExpired { code } => (
                "gone",
                "Short link has expired".to_string(),
                json!({ "code": code }),
            ),
            Self::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
            Self::DuplicateCode { .. } | Self::Storage(_) | Self::Internal(_) => {
                ("internal_error", "Internal server error".to_string(), json!({}))
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Request validation failed", json!(e.field_errors()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
