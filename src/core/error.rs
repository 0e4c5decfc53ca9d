//! # Error Handling Module
//!
//! This module provides the typed failure taxonomy used across the client.
//! Every backend or transport failure is classified into one [`ApiError`]
//! variant so that callers pattern-match on error kinds instead of
//! inspecting ad hoc status fields.
//!
//! ## Classification rules
//! - 401 → `Unauthorized`, 403 → `Forbidden`, 404 → `NotFound`, 429 → `RateLimited`
//! - other 4xx carrying an envelope `message`/`errors` body → `Validation`
//! - transport-level failures (no response, timeout) → `Network`
//! - everything else → `Unknown`
//!
//! Cache operations never produce an `ApiError`; they are pure in-memory
//! operations and cannot fail.

use crate::core::types::FieldError;
use reqwest::StatusCode;
use thiserror::Error;

/// Main result type used throughout the client
pub type ApiResult<T> = Result<T, ApiError>;

/// Discriminant for [`ApiError`] variants
///
/// Useful in tests and telemetry where only the category matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    Network,
    Validation,
    Config,
    Unknown,
}

/// Typed failure surfaced by the request executor
///
/// The `#[error("...")]` attribute from `thiserror` implements `Display`
/// with the given message for each variant.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// Session is missing or the token was rejected (HTTP 401)
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Authenticated but not allowed to perform the operation (HTTP 403)
    #[error("forbidden: {reason}")]
    Forbidden { reason: String },

    /// The requested resource does not exist (HTTP 404)
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Request rejected by rate limiting (HTTP 429)
    #[error("rate limited{}", .retry_after_secs.map(|s| format!(", retry after {}s", s)).unwrap_or_default())]
    RateLimited { retry_after_secs: Option<u64> },

    /// Transport-level failure: connection refused, DNS, timeout
    #[error("network error: {message}")]
    Network { message: String },

    /// The backend rejected the request payload (4xx with a message body)
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Client configuration is invalid (bad base URL, unparsable file)
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Anything that does not fit the categories above (e.g. 5xx)
    #[error("unexpected error: {message}")]
    Unknown { message: String },
}

impl ApiError {
    /// Create an unauthorized error with a custom reason
    pub fn unauthorized<S: Into<String>>(reason: S) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Create a forbidden error with a custom reason
    pub fn forbidden<S: Into<String>>(reason: S) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    /// Create a not-found error naming the missing resource
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a rate-limited error with an optional retry hint
    pub fn rate_limited(retry_after_secs: Option<u64>) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Create a network error with a custom message
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a validation error without field-level details
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Create a validation error carrying per-field messages
    pub fn validation_with_errors<S: Into<String>>(message: S, errors: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            errors,
        }
    }

    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown error with a custom message
    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    /// Classify an HTTP response status into an error
    ///
    /// `message` and `errors` come from the decoded response envelope when
    /// the body was parseable; they refine the 4xx classification.
    pub fn from_status(
        status: StatusCode,
        message: Option<String>,
        errors: Vec<FieldError>,
    ) -> Self {
        let detail = |fallback: &str| message.clone().unwrap_or_else(|| fallback.to_string());

        match status {
            StatusCode::UNAUTHORIZED => Self::unauthorized(detail("session expired or missing")),
            StatusCode::FORBIDDEN => Self::forbidden(detail("access denied")),
            StatusCode::NOT_FOUND => Self::not_found(detail("resource")),
            StatusCode::TOO_MANY_REQUESTS => Self::rate_limited(None),
            s if s.is_client_error() => {
                // A 4xx with a message or field errors is a payload problem;
                // a bare 4xx has nothing actionable and stays Unknown.
                if message.is_some() || !errors.is_empty() {
                    Self::validation_with_errors(detail("request rejected"), errors)
                } else {
                    Self::unknown(format!("unexpected client error: {}", s))
                }
            }
            s => Self::unknown(detail(&format!("server error: {}", s))),
        }
    }

    /// The category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Config { .. } => ErrorKind::Config,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }

    /// Short human-readable description suitable for a user notification
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "Please sign in again to continue.".to_string(),
            Self::Forbidden { .. } => "You don't have permission to do that.".to_string(),
            Self::NotFound { resource } => format!("{} could not be found.", resource),
            Self::RateLimited { retry_after_secs } => match retry_after_secs {
                Some(secs) => format!("Too many requests. Try again in {} seconds.", secs),
                None => "Too many requests. Please try again shortly.".to_string(),
            },
            Self::Network { .. } => "Connection problem. Check your network and retry.".to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::Config { message } => format!("Client misconfigured: {}", message),
            Self::Unknown { .. } => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {}", err))
        } else if err.is_connect() || err.is_request() {
            Self::network(err.to_string())
        } else if err.is_decode() {
            Self::unknown(format!("malformed response body: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::config(format!("invalid URL: {}", err))
    }
}
