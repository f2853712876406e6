//! Error types for the ServiceNow MCP server.
//!
//! This module defines `SnowError`, the unified error type used throughout
//! the crate for consistent error handling and propagation.
//!
//! # Security
//!
//! Error messages may embed response bodies from the instance. Use
//! `sanitize_message()` before logging or returning anything that could
//! contain a credential.

use std::time::Duration;
use thiserror::Error;

/// Unified error type for all ServiceNow operations.
///
/// Each variant provides specific context about the failure, enabling
/// meaningful error messages without leaking credentials.
#[derive(Error, Debug)]
pub enum SnowError {
    /// Configuration error - missing or invalid environment variables.
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
    HttpStatus {
        /// The HTTP status code returned.
        status: reqwest::StatusCode,
        /// The response body, potentially containing error details.
        body: String,
    },

    /// Request timed out.
    #[error("request timed out after {duration:?} - the instance may be slow or unreachable")]
    Timeout {
        /// How long we waited before timing out.
        duration: Duration,
        /// The operation that timed out.
        operation: String,
    },

    /// Rate limited by the instance (HTTP 429).
    #[error("rate limited by instance - please wait before retrying")]
    RateLimited {
        /// Suggested retry delay, if provided by the instance.
        retry_after: Option<Duration>,
    },

    /// Instance temporarily unavailable (HTTP 502/503/504).
    #[error("service temporarily unavailable ({status})")]
    ServiceUnavailable {
        /// The specific status code.
        status: reqwest::StatusCode,
    },

    /// The Table API answered with a ServiceNow error document.
    #[error("ServiceNow API error ({status}): {message}")]
    Api {
        /// HTTP status the error came with.
        status: reqwest::StatusCode,
        /// `error.message` from the response.
        message: String,
        /// `error.detail` from the response, when present.
        detail: Option<String>,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested record was not found.
    #[error("record not found: {id}")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// Authentication failed - bad credentials or missing role.
    #[error("authentication failed - check the configured ServiceNow credentials")]
    Authentication,

    /// Input validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Client-side decoding of a payload failed.
    #[error("decode error: {0}")]
    Decode(String),

    /// Connection test failed.
    #[error("connection test failed: {message}")]
    ConnectionTest {
        /// Details about why the connection test failed.
        message: String,
    },
}

impl SnowError {
    /// Creates a configuration error for a missing environment variable.
    pub fn missing_env(var_name: &str) -> Self {
        SnowError::Config(format!(
            "missing required environment variable: {}",
            var_name
        ))
    }

    /// Creates a configuration error for an invalid value.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SnowError::Config(message.into())
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        SnowError::Validation(message.into())
    }

    /// Creates a not found error for a record identifier.
    pub fn not_found(id: impl Into<String>) -> Self {
        SnowError::NotFound { id: id.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(duration: Duration, operation: impl Into<String>) -> Self {
        SnowError::Timeout {
            duration,
            operation: operation.into(),
        }
    }

    /// Creates a connection test error.
    pub fn connection_test(message: impl Into<String>) -> Self {
        SnowError::ConnectionTest {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and the operation may be retried.
    ///
    /// Retryable errors include:
    /// - Rate limiting (HTTP 429)
    /// - Service unavailable (HTTP 502, 503, 504)
    /// - Timeouts and connection failures
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SnowError::RateLimited { .. } => true,
            SnowError::ServiceUnavailable { .. } => true,
            SnowError::Timeout { .. } => true,
            SnowError::Http(e) => e.is_timeout() || e.is_connect(),
            SnowError::HttpStatus { status, .. } => status.as_u16() == 429,
            _ => false,
        }
    }

    /// Returns true if this is a rate limit error, indicating we should back off.
    #[must_use]
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SnowError::RateLimited { .. })
            || matches!(self, SnowError::HttpStatus { status, .. } if status.as_u16() == 429)
    }

    /// Returns the suggested delay before retry, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SnowError::RateLimited { retry_after } => *retry_after,
            SnowError::ServiceUnavailable { .. } => Some(Duration::from_millis(500)),
            SnowError::Timeout { .. } => Some(Duration::from_millis(100)),
            _ => None,
        }
    }

    /// Replaces every occurrence of each secret in `message` with `[REDACTED]`.
    ///
    /// Empty secrets are ignored so that an unset credential cannot blank out
    /// the whole message.
    #[must_use]
    pub fn sanitize_message<S: AsRef<str>>(message: &str, secrets: &[S]) -> String {
        secrets
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .fold(message.to_string(), |acc, secret| {
                acc.replace(secret, "[REDACTED]")
            })
    }

    /// Creates a sanitized version of this error's display message.
    #[must_use]
    pub fn sanitized_display<S: AsRef<str>>(&self, secrets: &[S]) -> String {
        Self::sanitize_message(&self.to_string(), secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env_error() {
        let err = SnowError::missing_env("SERVICENOW_INSTANCE_URL");
        assert!(err.to_string().contains("SERVICENOW_INSTANCE_URL"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_validation_error() {
        let err = SnowError::validation("name is required");
        assert_eq!(err.to_string(), "validation error: name is required");
    }

    #[test]
    fn test_not_found_error() {
        let err = SnowError::not_found("abc123");
        assert_eq!(err.to_string(), "record not found: abc123");
    }

    #[test]
    fn test_timeout_error() {
        let err = SnowError::timeout(Duration::from_secs(30), "GET sys_atf_step");
        let msg = err.to_string();
        assert!(msg.contains("timed out"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn test_api_error_display() {
        let err = SnowError::Api {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "Invalid table sp_pagez".to_string(),
            detail: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("400"));
        assert!(msg.contains("Invalid table sp_pagez"));
    }

    #[test]
    fn test_is_retryable_rate_limited() {
        let err = SnowError::RateLimited { retry_after: None };
        assert!(err.is_retryable());
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_plain_internal_error_is_not_retried() {
        let err = SnowError::HttpStatus {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "Internal error".to_string(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_retryable_service_unavailable() {
        let err = SnowError::ServiceUnavailable {
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(err.is_retryable());
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_is_retryable_permanent_errors() {
        assert!(!SnowError::not_found("x").is_retryable());
        assert!(!SnowError::validation("bad").is_retryable());
        assert!(!SnowError::Authentication.is_retryable());
    }

    #[test]
    fn test_sanitize_message_removes_all_secrets() {
        let message = "login admin:hunter2 with token tok_123";
        let sanitized = SnowError::sanitize_message(message, &["hunter2", "tok_123"]);
        assert!(!sanitized.contains("hunter2"));
        assert!(!sanitized.contains("tok_123"));
        assert_eq!(sanitized.matches("[REDACTED]").count(), 2);
    }

    #[test]
    fn test_sanitize_message_empty_secret() {
        let message = "Some error message";
        let sanitized = SnowError::sanitize_message(message, &[""]);
        assert_eq!(sanitized, message);
    }

    #[test]
    fn test_retry_after_rate_limited() {
        let err = SnowError::RateLimited {
            retry_after: Some(Duration::from_secs(5)),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_connection_test_error() {
        let err = SnowError::connection_test("Could not reach instance");
        let msg = err.to_string();
        assert!(msg.contains("connection test failed"));
        assert!(msg.contains("Could not reach instance"));
    }
}
