//! Google Fact Check Tools API provider.
//!
//! Issues claim lookups against the claims:search endpoint. Two auth modes
//! with identical call semantics:
//! - keyed: `key` query parameter alongside `query`;
//! - authenticated: `Authorization: Bearer` header, token taken from the
//!   configured credential file.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::FactCheckProvider;
use crate::config::FactCheckConfig;
use crate::error::FactCheckError;

/// The default Fact Check Tools API base URL.
const DEFAULT_BASE_URL: &str = "https://factchecktools.googleapis.com/v1alpha1";

/// Process-wide HTTP client handle, initialized at most once; concurrent
/// first users race to a single winner and the losers reuse its handle.
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

fn shared_client() -> Client {
    SHARED_CLIENT.get_or_init(Client::new).clone()
}

/// Authentication mode for the fact-check endpoint.
#[derive(Debug, Clone)]
pub enum FactCheckAuth {
    /// API key passed as the `key` query parameter.
    ApiKey(String),
    /// Bearer token passed in the Authorization header.
    Bearer(String),
}

/// Fact Check Tools API provider.
pub struct GoogleFactCheckProvider {
    client: Client,
    base_url: String,
    auth: FactCheckAuth,
    timeout: Duration,
}

impl GoogleFactCheckProvider {
    /// Create a provider using the given auth mode.
    pub fn new(config: &FactCheckConfig, auth: FactCheckAuth) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: shared_client(),
            base_url,
            auth,
            timeout: Duration::from_secs_f64(config.timeout_secs.max(0.0)),
        }
    }

    /// Create a keyed provider.
    pub fn with_api_key(config: &FactCheckConfig, api_key: String) -> Self {
        Self::new(config, FactCheckAuth::ApiKey(api_key))
    }

    /// Create an authenticated provider from a credential file.
    ///
    /// The file must hold a usable access token: either a JSON document
    /// with an `access_token`/`token` field, or the bare token itself.
    pub fn with_credential_file(
        config: &FactCheckConfig,
        path: &Path,
    ) -> Result<Self, FactCheckError> {
        let raw = std::fs::read_to_string(path).map_err(|e| FactCheckError::AuthFailed {
            message: format!("cannot read credential file '{}': {}", path.display(), e),
        })?;
        let token = extract_token(&raw).ok_or_else(|| FactCheckError::AuthFailed {
            message: format!(
                "credential file '{}' holds no usable token",
                path.display()
            ),
        })?;
        Ok(Self::new(config, FactCheckAuth::Bearer(token)))
    }

    fn map_http_error(status: StatusCode, retry_after_secs: Option<u64>, body: &str) -> FactCheckError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FactCheckError::AuthFailed {
                message: format!("HTTP {}: {}", status.as_u16(), snippet(body)),
            },
            StatusCode::TOO_MANY_REQUESTS => FactCheckError::RateLimited {
                retry_after_secs: retry_after_secs.unwrap_or(1),
            },
            s if s.is_server_error() => FactCheckError::Connection {
                message: format!("HTTP {}: {}", s.as_u16(), snippet(body)),
            },
            s => FactCheckError::ApiRequest {
                message: format!("HTTP {}: {}", s.as_u16(), snippet(body)),
            },
        }
    }
}

#[async_trait]
impl FactCheckProvider for GoogleFactCheckProvider {
    async fn search(&self, query: &str) -> Result<Vec<Value>, FactCheckError> {
        let url = format!("{}/claims:search", self.base_url);
        debug!(url = url.as_str(), "Sending fact-check lookup");

        let mut request = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[("query", query)]);
        request = match &self.auth {
            FactCheckAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            FactCheckAuth::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FactCheckError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                }
            } else if e.is_connect() {
                FactCheckError::Connection {
                    message: e.to_string(),
                }
            } else {
                FactCheckError::ApiRequest {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response
            .text()
            .await
            .map_err(|e| FactCheckError::ResponseParse {
                message: format!("failed to read response body: {}", e),
            })?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, retry_after_secs, &body));
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| FactCheckError::ResponseParse {
                message: format!("invalid JSON in response: {}", e),
            })?;

        Ok(payload
            .get("claims")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "google-factcheck"
    }
}

/// Pull a token out of credential file contents.
fn extract_token(raw: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        for key in ["access_token", "token"] {
            if let Some(token) = value.get(key).and_then(Value::as_str) {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
        return None;
    }
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn snippet(body: &str) -> &str {
    let mut end = body.len().min(200);
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extract_token_from_json() {
        assert_eq!(
            extract_token(r#"{"access_token": "ya29.abc"}"#).as_deref(),
            Some("ya29.abc")
        );
        assert_eq!(
            extract_token(r#"{"token": "tok"}"#).as_deref(),
            Some("tok")
        );
        assert!(extract_token(r#"{"type": "service_account"}"#).is_none());
    }

    #[test]
    fn test_extract_token_bare() {
        assert_eq!(extract_token("  raw-token\n").as_deref(), Some("raw-token"));
        assert!(extract_token("   ").is_none());
    }

    #[test]
    fn test_with_credential_file_missing() {
        let config = FactCheckConfig::default();
        let result =
            GoogleFactCheckProvider::with_credential_file(&config, Path::new("/nonexistent"));
        assert!(matches!(result, Err(FactCheckError::AuthFailed { .. })));
    }

    #[test]
    fn test_with_credential_file_bare_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "my-bearer-token").unwrap();
        let config = FactCheckConfig::default();
        let provider =
            GoogleFactCheckProvider::with_credential_file(&config, file.path()).unwrap();
        assert!(matches!(provider.auth, FactCheckAuth::Bearer(ref t) if t == "my-bearer-token"));
    }

    #[test]
    fn test_map_http_error_variants() {
        let err = GoogleFactCheckProvider::map_http_error(StatusCode::FORBIDDEN, None, "denied");
        assert!(matches!(err, FactCheckError::AuthFailed { .. }));

        let err =
            GoogleFactCheckProvider::map_http_error(StatusCode::TOO_MANY_REQUESTS, Some(30), "");
        assert!(matches!(
            err,
            FactCheckError::RateLimited {
                retry_after_secs: 30
            }
        ));

        let err = GoogleFactCheckProvider::map_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            "oops",
        );
        assert!(matches!(err, FactCheckError::Connection { .. }));

        let err = GoogleFactCheckProvider::map_http_error(StatusCode::BAD_REQUEST, None, "bad");
        assert!(matches!(err, FactCheckError::ApiRequest { .. }));
    }

    #[test]
    fn test_default_base_url_applied() {
        let config = FactCheckConfig::default();
        let provider =
            GoogleFactCheckProvider::with_api_key(&config, "k".into());
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }
}
