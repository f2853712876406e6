//! Credential attachment for outgoing requests.
//!
//! `AuthProvider` turns the configured [`AuthConfig`] into request headers.
//! It is the only place that touches raw secrets after configuration is
//! loaded, and it also hands them out (via [`AuthProvider::secrets`]) so
//! error messages can be scrubbed before they are logged or returned.

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::RequestBuilder;

use crate::config::AuthConfig;
use crate::error::SnowError;

/// Attaches credentials to every request sent to the instance.
#[derive(Clone)]
pub struct AuthProvider {
    scheme: AuthScheme,
}

#[derive(Clone)]
enum AuthScheme {
    Basic { username: String, password: String },
    Bearer { token: String },
    ApiKey { header: HeaderName, key: HeaderValue, raw: String },
}

impl AuthProvider {
    /// Builds a provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns `SnowError::Config` when an API key header name or value
    /// cannot be represented as an HTTP header.
    pub fn new(auth: &AuthConfig) -> Result<Self, SnowError> {
        let scheme = match auth {
            AuthConfig::Basic { username, password } => AuthScheme::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            AuthConfig::OAuth { token } => AuthScheme::Bearer {
                token: token.clone(),
            },
            AuthConfig::ApiKey { header, key } => {
                let name = HeaderName::from_bytes(header.as_bytes()).map_err(|_| {
                    SnowError::invalid_config(format!(
                        "SERVICENOW_API_KEY_HEADER is not a valid header name: {:?}",
                        header
                    ))
                })?;
                let mut value = HeaderValue::from_str(key).map_err(|_| {
                    SnowError::invalid_config("SERVICENOW_API_KEY contains invalid characters")
                })?;
                value.set_sensitive(true);
                AuthScheme::ApiKey {
                    header: name,
                    key: value,
                    raw: key.clone(),
                }
            }
        };
        Ok(Self { scheme })
    }

    /// Attaches the credentials to a request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.scheme {
            AuthScheme::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthScheme::Bearer { token } => request.bearer_auth(token),
            AuthScheme::ApiKey { header, key, .. } => request.header(header.clone(), key.clone()),
        }
    }

    /// Short name of the scheme in use, safe to log.
    pub fn scheme_name(&self) -> &'static str {
        match self.scheme {
            AuthScheme::Basic { .. } => "basic",
            AuthScheme::Bearer { .. } => "oauth",
            AuthScheme::ApiKey { .. } => "api_key",
        }
    }

    /// Secret values that must be scrubbed from any outgoing message.
    pub(crate) fn secrets(&self) -> Vec<&str> {
        match &self.scheme {
            AuthScheme::Basic { password, .. } => vec![password.as_str()],
            AuthScheme::Bearer { token } => vec![token.as_str()],
            AuthScheme::ApiKey { raw, .. } => vec![raw.as_str()],
        }
    }
}

impl std::fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("scheme", &self.scheme_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_of(provider: &AuthProvider, name: &str) -> Option<String> {
        let request = provider
            .apply(reqwest::Client::new().get("https://dev1.service-now.com/api/now/table/x"))
            .build()
            .unwrap();
        request
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_basic_auth_header() {
        let provider = AuthProvider::new(&AuthConfig::Basic {
            username: "admin".to_string(),
            password: "pw".to_string(),
        })
        .unwrap();
        // base64("admin:pw")
        assert_eq!(
            header_of(&provider, "authorization").as_deref(),
            Some("Basic YWRtaW46cHc=")
        );
        assert_eq!(provider.scheme_name(), "basic");
    }

    #[test]
    fn test_bearer_header() {
        let provider = AuthProvider::new(&AuthConfig::OAuth {
            token: "tok".to_string(),
        })
        .unwrap();
        assert_eq!(
            header_of(&provider, "authorization").as_deref(),
            Some("Bearer tok")
        );
    }

    #[test]
    fn test_api_key_header() {
        let provider = AuthProvider::new(&AuthConfig::ApiKey {
            header: "x-sn-apikey".to_string(),
            key: "k-123".to_string(),
        })
        .unwrap();
        assert_eq!(header_of(&provider, "x-sn-apikey").as_deref(), Some("k-123"));
        assert_eq!(provider.secrets(), vec!["k-123"]);
    }

    #[test]
    fn test_invalid_header_name_rejected() {
        let result = AuthProvider::new(&AuthConfig::ApiKey {
            header: "bad header".to_string(),
            key: "k".to_string(),
        });
        assert!(matches!(result, Err(SnowError::Config(_))));
    }

    #[test]
    fn test_debug_omits_secrets() {
        let provider = AuthProvider::new(&AuthConfig::OAuth {
            token: "very-secret".to_string(),
        })
        .unwrap();
        assert!(!format!("{:?}", provider).contains("very-secret"));
    }
}
