//! Configuration management for the ServiceNow MCP server.
//!
//! This module handles loading configuration from environment variables,
//! with validation to ensure all required values are present.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::SnowError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default header carrying an API key.
pub const DEFAULT_API_KEY_HEADER: &str = "x-sn-apikey";

/// How requests authenticate against the instance.
///
/// Secrets held here must never be logged or included in error messages.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// HTTP Basic authentication with a local ServiceNow user.
    Basic {
        /// User name.
        username: String,
        /// Password.
        password: String,
    },
    /// OAuth access token sent as `Authorization: Bearer`.
    OAuth {
        /// Access token.
        token: String,
    },
    /// API key sent in a custom header.
    ApiKey {
        /// Header name (e.g. `x-sn-apikey`).
        header: String,
        /// Key value.
        key: String,
    },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            AuthConfig::OAuth { .. } => f.debug_struct("OAuth").finish_non_exhaustive(),
            AuthConfig::ApiKey { header, .. } => f
                .debug_struct("ApiKey")
                .field("header", header)
                .finish_non_exhaustive(),
        }
    }
}

/// Configuration for connecting to a ServiceNow instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instance URL (e.g., `https://dev12345.service-now.com`), without trailing slash.
    pub instance_url: String,

    /// Credentials attached to every request.
    pub auth: AuthConfig,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Config {
    /// Builds a configuration directly, validating the instance URL.
    pub fn new(instance_url: impl Into<String>, auth: AuthConfig) -> Result<Self, SnowError> {
        Ok(Config {
            instance_url: Self::validate_instance_url(instance_url.into())?,
            auth,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SERVICENOW_INSTANCE_URL` (required)
    /// - `SERVICENOW_AUTH_TYPE`: `basic` (default), `oauth` or `api_key`
    /// - `SERVICENOW_USERNAME` / `SERVICENOW_PASSWORD` for basic auth
    /// - `SERVICENOW_TOKEN` for oauth
    /// - `SERVICENOW_API_KEY` and optional `SERVICENOW_API_KEY_HEADER` for api_key
    /// - `SERVICENOW_TIMEOUT_SECS` (optional, default 30)
    ///
    /// # Errors
    ///
    /// Returns `SnowError::Config` if any required variable is missing
    /// or if values fail validation.
    pub fn from_env() -> Result<Self, SnowError> {
        let instance_url = Self::get_required_env("SERVICENOW_INSTANCE_URL")?;
        let instance_url = Self::validate_instance_url(instance_url)?;

        let auth_type = env::var("SERVICENOW_AUTH_TYPE").unwrap_or_else(|_| "basic".to_string());
        let auth = match auth_type.trim().to_lowercase().as_str() {
            "basic" => AuthConfig::Basic {
                username: Self::get_required_env("SERVICENOW_USERNAME")?,
                password: Self::get_required_env("SERVICENOW_PASSWORD")?,
            },
            "oauth" => AuthConfig::OAuth {
                token: Self::get_required_env("SERVICENOW_TOKEN")?,
            },
            "api_key" => AuthConfig::ApiKey {
                header: env::var("SERVICENOW_API_KEY_HEADER")
                    .ok()
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
                key: Self::get_required_env("SERVICENOW_API_KEY")?,
            },
            other => {
                return Err(SnowError::invalid_config(format!(
                    "SERVICENOW_AUTH_TYPE must be basic, oauth or api_key, got {:?}",
                    other
                )))
            }
        };
        Self::validate_secrets(&auth)?;

        let timeout = match env::var("SERVICENOW_TIMEOUT_SECS") {
            Ok(raw) => Self::parse_timeout(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Config {
            instance_url,
            auth,
            timeout,
        })
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, SnowError> {
        env::var(name)
            .map_err(|_| SnowError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(SnowError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Validates and normalizes the instance URL.
    fn validate_instance_url(url: String) -> Result<String, SnowError> {
        let url = url.trim().trim_end_matches('/').to_string();

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SnowError::invalid_config(
                "SERVICENOW_INSTANCE_URL must start with http:// or https://",
            ));
        }

        let parsed = Url::parse(&url).map_err(|e| {
            SnowError::invalid_config(format!("SERVICENOW_INSTANCE_URL is not a valid URL: {}", e))
        })?;
        if parsed.host_str().is_none() {
            return Err(SnowError::invalid_config(
                "SERVICENOW_INSTANCE_URL must include a host",
            ));
        }

        Ok(url)
    }

    fn parse_timeout(raw: &str) -> Result<Duration, SnowError> {
        match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(SnowError::invalid_config(
                "SERVICENOW_TIMEOUT_SECS must be a positive integer",
            )),
            Ok(secs) => Ok(Duration::from_secs(secs)),
        }
    }

    /// Rejects secrets that are obviously placeholder values.
    fn validate_secrets(auth: &AuthConfig) -> Result<(), SnowError> {
        let secret = match auth {
            AuthConfig::Basic { password, .. } => password,
            AuthConfig::OAuth { token } => token,
            AuthConfig::ApiKey { key, .. } => key,
        };
        let lower = secret.to_lowercase();
        let placeholder_patterns = [
            "your_password",
            "your_token",
            "your_api_key",
            "placeholder",
            "changeme",
        ];

        if placeholder_patterns.iter().any(|p| lower.contains(p)) {
            return Err(SnowError::invalid_config(
                "configured ServiceNow secret appears to be a placeholder value",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests that modify environment variables would race with each other,
    // so only the pure validation helpers are covered here.

    #[test]
    fn test_validate_instance_url_removes_trailing_slash() {
        let result = Config::validate_instance_url("https://dev1.service-now.com/".to_string())
            .unwrap();
        assert_eq!(result, "https://dev1.service-now.com");
    }

    #[test]
    fn test_validate_instance_url_requires_scheme() {
        assert!(Config::validate_instance_url("dev1.service-now.com".to_string()).is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(Config::parse_timeout("45").unwrap(), Duration::from_secs(45));
        assert!(Config::parse_timeout("0").is_err());
        assert!(Config::parse_timeout("soon").is_err());
    }

    #[test]
    fn test_validate_secrets_rejects_placeholder() {
        let auth = AuthConfig::Basic {
            username: "admin".to_string(),
            password: "changeme".to_string(),
        };
        assert!(Config::validate_secrets(&auth).is_err());
    }

    #[test]
    fn test_validate_secrets_accepts_real_token() {
        let auth = AuthConfig::OAuth {
            token: "Qm9pbGVkIGVnZ3M".to_string(),
        };
        assert!(Config::validate_secrets(&auth).is_ok());
    }

    #[test]
    fn test_auth_debug_hides_password() {
        let auth = AuthConfig::Basic {
            username: "admin".to_string(),
            password: "s3cret-value".to_string(),
        };
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret-value"));
    }

    #[test]
    fn test_new_uses_default_timeout() {
        let config = Config::new(
            "https://dev1.service-now.com",
            AuthConfig::OAuth {
                token: "abc".to_string(),
            },
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
