//! Error types for zenkly.
//!
//! This module defines `ZenklyError`, the unified error type used throughout
//! the crate for consistent error handling and propagation.
//!
//! # Security
//!
//! Error messages built from response bodies are sanitized so the account
//! password never reaches logs or the terminal. Use `sanitize_message()` when
//! constructing error messages from external sources.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for all zenkly operations.
///
/// Each variant provides specific context about the failure, enabling
/// meaningful error messages without leaking credentials.
#[derive(Error, Debug)]
pub enum ZenklyError {
    /// No credential profile could be resolved.
    #[error("no configuration found for profile '{profile}' - try `zenkly configure`")]
    ConfigurationMissing {
        /// The profile that was requested.
        profile: String,
    },

    /// Configuration error - unreadable file or invalid values.
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request failed during transmission.
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// HTTP client initialization failed.
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// HTTP response returned a non-success status code.
    #[error("HTTP {status}: {body}")]
    Transport {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, sanitized and truncated.
        body: String,
        /// Suggested retry delay from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// A successful response whose body is not the expected JSON.
    #[error("unexpected response format: {message}")]
    ResponseFormat {
        /// What was wrong with the body.
        message: String,
        /// The start of the offending body.
        body: String,
    },

    /// The API reported an error inside an otherwise successful response.
    #[error("API error: {message}")]
    Api {
        /// Message taken from the `error` field of the response.
        message: String,
    },

    /// A local input file is missing or has the wrong shape.
    #[error("problem loading {}: {reason}", path.display())]
    LocalInput {
        /// The file that was being read.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// An asynchronous job finished in the `failed` state.
    #[error("job {job_id} failed: {}", errors.join(", "))]
    AsyncJobFailed {
        /// The job identifier.
        job_id: String,
        /// Each error rendered as `<title>: <code>`.
        errors: Vec<String>,
    },

    /// An operation did not finish in time.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        /// How long we waited before giving up.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// Pagination kept returning a next page past the configured bound.
    #[error("pagination stopped after {max_pages} pages, next page was {url}")]
    PageLimitExceeded {
        /// The page bound that was hit.
        max_pages: usize,
        /// The next page URL the server still advertised.
        url: String,
    },

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ZenklyError {
    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ZenklyError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ZenklyError::Validation(message.into())
    }

    /// Creates a local input error for `path`.
    pub fn local_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ZenklyError::LocalInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a response format error, keeping at most 200 bytes of the body.
    pub fn response_format(message: impl Into<String>, body: &str) -> Self {
        let mut end = body.len().min(200);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        ZenklyError::ResponseFormat {
            message: message.into(),
            body: body[..end].to_string(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        ZenklyError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Returns true if this error is transient and the request should be retried.
    ///
    /// Only HTTP 429 and 503 qualify; every other status is final.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ZenklyError::Transport { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || *status == reqwest::StatusCode::SERVICE_UNAVAILABLE
            }
            _ => false,
        }
    }

    /// Returns the server-suggested delay before retry, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ZenklyError::Transport { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Sanitizes an error message to remove any occurrence of the secret.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to sanitize
    /// * `secret` - The password or token to strip from the message
    ///
    /// # Returns
    ///
    /// The message with any occurrence of the secret replaced with `[REDACTED]`
    #[must_use]
    pub fn sanitize_message(message: &str, secret: &str) -> String {
        if secret.is_empty() {
            return message.to_string();
        }
        message.replace(secret, "[REDACTED]")
    }
}
