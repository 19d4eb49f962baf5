//! Error taxonomy shared by every crate in the workspace.
//!
//! Library code returns [`CoreError`] (or a crate-local error that converts
//! into it); only the HTTP/JSON-RPC edge (`corpora-api`) translates these
//! into status codes or JSON-RPC error objects.

use thiserror::Error;

/// The error kinds from spec §7. Each variant carries a human message; a
/// stable machine-readable tag is derived via [`CoreError::tag`].
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("{errors:?}")]
    ValidationFields {
        message: String,
        errors: Vec<String>,
    },

    #[error("authentication error: {message}")]
    Auth { message: String },

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("crypto error: {message}")]
    Crypto { message: String },

    #[error("embedder error: {message}")]
    Embedder {
        message: String,
        retryable: bool,
    },

    #[error("parse error ({kind}): {message}")]
    Parse { kind: String, message: String },
}

impl CoreError {
    /// Stable machine-readable error tag surfaced to clients.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::ValidationFields { .. } => "validation_error",
            Self::Auth { .. } => "auth_error",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::RateLimited { .. } => "rate_limited",
            Self::Internal { .. } => "internal_error",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::Crypto { .. } => "internal_error",
            Self::Embedder { .. } => "embedder_error",
            Self::Parse { .. } => "parse_error",
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a background worker should retry the attempt that produced
    /// this error (spec §4.11 retry policy).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::RateLimited { .. }
        ) || matches!(self, Self::Embedder { retryable, .. } if *retryable)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
