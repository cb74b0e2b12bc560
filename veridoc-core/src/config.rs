//! Configuration system for Veridoc.
//!
//! Uses `figment` for layered configuration: defaults -> config file ->
//! environment. Environment variables are prefixed with `VERIDOC_` and use
//! `__` for nesting (`VERIDOC_FACTCHECK__API_KEY`,
//! `VERIDOC_CLAIMS__MAX_CLAIMS`, ...).
//!
//! Every default is safe: with nothing configured, live fact checking is
//! disabled gracefully and the rest of the pipeline runs fully offline.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub factcheck: FactCheckConfig,
    pub claims: ClaimsConfig,
    pub summary: SummaryConfig,
}

/// Fact-check service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckConfig {
    /// Path to a service-account credential file. Checked for existence
    /// before use; a configured but missing file counts as unconfigured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_file: Option<PathBuf>,
    /// Explicit API key. Takes priority over `api_key_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Optional base URL override for the fact-check search endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: f64,
    /// Retry behavior for transient request failures.
    pub retry: RetryConfig,
    /// Settle delay between consecutive claim lookups, in milliseconds.
    /// A rate-limit courtesy to the external service, not a correctness
    /// requirement.
    pub request_delay_ms: u64,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            service_account_file: None,
            api_key: None,
            api_key_env: "GOOGLE_FACT_CHECK_API_KEY".to_string(),
            base_url: None,
            timeout_secs: 8.0,
            retry: RetryConfig::default(),
            request_delay_ms: 350,
        }
    }
}

/// Retry behavior for a single claim's verification call.
///
/// Backoff is linear: `backoff_step_ms * attempt_number` between attempts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per claim (first try included).
    pub max_attempts: u32,
    /// Linear backoff step in milliseconds.
    pub backoff_step_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_step_ms: 400,
        }
    }
}

/// Claim extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsConfig {
    /// Maximum number of claim candidates returned per document.
    pub max_claims: usize,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self { max_claims: 8 }
    }
}

/// Summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Whether to call the configured external summarizer. When false the
    /// offline heuristic summarizer is used directly.
    pub use_external: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { use_external: true }
    }
}

impl FactCheckConfig {
    /// Validate this config and return any warnings.
    ///
    /// Returns human-readable warning messages for problematic values
    /// (backward compatible; does not error).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.timeout_secs <= 0.0 {
            warnings.push(format!(
                "timeout_secs ({}) is not positive; requests will fail immediately",
                self.timeout_secs
            ));
        }
        if self.retry.max_attempts == 0 {
            warnings.push("retry.max_attempts is 0; no verification call will ever run".into());
        }
        if let Some(ref path) = self.service_account_file {
            if !path.exists() {
                warnings.push(format!(
                    "service_account_file '{}' does not exist; falling back to API key",
                    path.display()
                ));
            }
        }
        warnings
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with `VERIDOC_`)
/// 2. Explicit config file (passed as argument)
/// 3. Built-in defaults
pub fn load_config(config_file: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(AnalysisConfig::default()));

    if let Some(path) = config_file {
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }
    }

    // Environment variables (VERIDOC_FACTCHECK__API_KEY, VERIDOC_CLAIMS__MAX_CLAIMS, etc.)
    figment = figment.merge(Env::prefixed("VERIDOC_").split("__"));

    figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_safe() {
        let config = AnalysisConfig::default();
        assert!(config.factcheck.service_account_file.is_none());
        assert!(config.factcheck.api_key.is_none());
        assert_eq!(config.factcheck.timeout_secs, 8.0);
        assert_eq!(config.factcheck.retry.max_attempts, 2);
        assert_eq!(config.factcheck.retry.backoff_step_ms, 400);
        assert_eq!(config.factcheck.request_delay_ms, 350);
        assert_eq!(config.claims.max_claims, 8);
        assert!(config.summary.use_external);
    }

    #[test]
    fn test_load_config_no_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.claims.max_claims, 8);
    }

    #[test]
    fn test_load_config_from_toml() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[factcheck]\ntimeout_secs = 4.0\nrequest_delay_ms = 100\n\n[claims]\nmax_claims = 5\n"
        )
        .unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.factcheck.timeout_secs, 4.0);
        assert_eq!(config.factcheck.request_delay_ms, 100);
        assert_eq!(config.claims.max_claims, 5);
        // Untouched sections keep their defaults.
        assert_eq!(config.factcheck.retry.max_attempts, 2);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/veridoc.toml"))).unwrap();
        assert_eq!(config.factcheck.retry.max_attempts, 2);
    }

    #[test]
    fn test_validate_flags_bad_timeout() {
        let config = FactCheckConfig {
            timeout_secs: 0.0,
            ..Default::default()
        };
        let warnings = config.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("timeout_secs"));
    }

    #[test]
    fn test_validate_flags_missing_credential_file() {
        let config = FactCheckConfig {
            service_account_file: Some(PathBuf::from("/nonexistent/creds.json")),
            ..Default::default()
        };
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("does not exist")));
    }

    #[test]
    fn test_validate_clean_config() {
        assert!(FactCheckConfig::default().validate().is_empty());
    }
}
