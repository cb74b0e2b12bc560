//! Claim verification against an external fact-check service.
//!
//! The [`FactCheckClient`] submits cleaned claim queries one at a time,
//! never in parallel, with a settle delay between lookups as a courtesy to
//! the external service's rate contract, and aggregates each payload's
//! rating records into a coarse verdict.
//!
//! Missing credentials are a normal, expected state: every claim gets an
//! explanatory `no_verdict` result and the network is never touched.

pub mod google;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{FactCheckConfig, RetryConfig};
use crate::error::FactCheckError;
use crate::sanitize::clean_query;
use crate::types::{VerdictStatus, VerificationResult};

pub use google::{FactCheckAuth, GoogleFactCheckProvider};

/// Only this many claims are ever submitted per document, regardless of
/// how many the extractor produced.
pub const MAX_SUBMITTED_CLAIMS: usize = 5;
/// Maximum cleaned query length handed to the service.
const MAX_QUERY_CHARS: usize = 110;

/// Rating values containing any of these count as a truthy signal.
const TRUTHY_MARKERS: [&str; 4] = ["true", "correct", "accurate", "mostly true"];
/// Rating values containing any of these count as a falsy signal.
const FALSY_MARKERS: [&str; 4] = ["false", "incorrect", "inaccurate", "mostly false"];

/// Trait for fact-check lookup providers.
#[async_trait]
pub trait FactCheckProvider: Send + Sync {
    /// Look up published fact checks for a query. Returns the raw rating
    /// records from the payload's `claims` collection, in response order.
    async fn search(&self, query: &str) -> Result<Vec<Value>, FactCheckError>;

    /// Provider label for logs.
    fn name(&self) -> &str;
}

/// Credential material resolved from configuration.
pub enum Credential {
    /// Existing service-account credential file.
    ServiceAccount(std::path::PathBuf),
    /// API key, from config or environment.
    ApiKey(String),
}

/// Resolve a credential, preferring the service-account file over the
/// explicit key over the key environment variable.
///
/// A configured but missing credential file is skipped, not an error.
pub fn resolve_credential(config: &FactCheckConfig) -> Option<Credential> {
    if let Some(path) = &config.service_account_file {
        if path.exists() {
            return Some(Credential::ServiceAccount(path.clone()));
        }
    }
    if let Some(key) = &config.api_key {
        if !key.is_empty() {
            return Some(Credential::ApiKey(key.clone()));
        }
    }
    if let Ok(key) = std::env::var(&config.api_key_env) {
        if !key.is_empty() {
            return Some(Credential::ApiKey(key));
        }
    }
    None
}

/// Create a fact-check provider for the resolved credential.
///
/// Prefers the authenticated client when a service-account file is
/// configured and present; falls back to a keyed request otherwise.
/// Returns `FactCheckError::NotConfigured` when no credential exists.
pub fn create_provider(
    config: &FactCheckConfig,
) -> Result<Arc<dyn FactCheckProvider>, FactCheckError> {
    match resolve_credential(config) {
        Some(Credential::ServiceAccount(path)) => Ok(Arc::new(
            GoogleFactCheckProvider::with_credential_file(config, &path)?,
        )),
        Some(Credential::ApiKey(key)) => {
            Ok(Arc::new(GoogleFactCheckProvider::with_api_key(config, key)))
        }
        None => Err(FactCheckError::NotConfigured),
    }
}

/// Execute an async operation with bounded attempts and linear backoff on
/// transient errors. Permanent errors (auth, parse) return immediately.
pub async fn with_retry<F, Fut, T>(retry: &RetryConfig, operation: F) -> Result<T, FactCheckError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FactCheckError>>,
{
    let mut last_err = None;
    for attempt in 1..=retry.max_attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !e.is_retryable() || attempt == retry.max_attempts {
                    return Err(e);
                }
                let backoff_ms = retry.backoff_step_ms * u64::from(attempt);
                warn!(
                    attempt,
                    max = retry.max_attempts,
                    backoff_ms,
                    error = %e,
                    "Retrying fact-check call after transient error"
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or(FactCheckError::Connection {
        message: "All retry attempts exhausted".to_string(),
    }))
}

/// Aggregate a payload's rating records into a verdict.
///
/// `verified` iff truthy signals strictly outnumber falsy ones and are
/// nonzero; `contradicted` in the mirror case; ties and silence are
/// `no_verdict`. A single rating can count on both sides when its text
/// matches both marker sets.
pub fn aggregate_verdict(records: &[Value]) -> VerdictStatus {
    let mut truthy = 0usize;
    let mut falsy = 0usize;

    for record in records {
        for rating in textual_ratings(record) {
            let lower = rating.to_lowercase();
            if TRUTHY_MARKERS.iter().any(|m| lower.contains(m)) {
                truthy += 1;
            }
            if FALSY_MARKERS.iter().any(|m| lower.contains(m)) {
                falsy += 1;
            }
        }
    }

    if truthy > falsy && truthy > 0 {
        VerdictStatus::Verified
    } else if falsy > truthy && falsy > 0 {
        VerdictStatus::Contradicted
    } else {
        VerdictStatus::NoVerdict
    }
}

/// Textual rating values carried by one record: each entry of the record's
/// `claimReview` collection, plus a top-level `textualRating` for flat
/// record shapes.
fn textual_ratings(record: &Value) -> Vec<String> {
    let mut ratings = Vec::new();
    if let Some(reviews) = record.get("claimReview").and_then(Value::as_array) {
        for review in reviews {
            if let Some(rating) = review.get("textualRating").and_then(Value::as_str) {
                ratings.push(rating.to_string());
            }
        }
    }
    if let Some(rating) = record.get("textualRating").and_then(Value::as_str) {
        ratings.push(rating.to_string());
    }
    ratings
}

/// Sequential claim verification client.
pub struct FactCheckClient {
    provider: Option<Arc<dyn FactCheckProvider>>,
    config: FactCheckConfig,
}

impl FactCheckClient {
    /// Build a client from configuration. An unconfigured credential is a
    /// normal state, not an error; the client then answers every claim
    /// with an explanatory `no_verdict`.
    pub fn from_config(config: &FactCheckConfig) -> Self {
        let provider = match create_provider(config) {
            Ok(provider) => {
                info!(provider = provider.name(), "Fact-check provider ready");
                Some(provider)
            }
            Err(FactCheckError::NotConfigured) => {
                info!("Fact-check not configured; verification disabled");
                None
            }
            Err(e) => {
                warn!(error = %e, "Fact-check provider unavailable; verification disabled");
                None
            }
        };
        Self {
            provider,
            config: config.clone(),
        }
    }

    /// Build a client around an explicit provider (tests, custom backends).
    pub fn with_provider(provider: Arc<dyn FactCheckProvider>, config: FactCheckConfig) -> Self {
        Self {
            provider: Some(provider),
            config,
        }
    }

    /// Verify claims one at a time, in order.
    ///
    /// At most [`MAX_SUBMITTED_CLAIMS`] claims are submitted. One result
    /// per submitted claim, in submission order.
    pub async fn fact_check_claims(&self, claims: &[String]) -> Vec<VerificationResult> {
        if claims.is_empty() {
            return Vec::new();
        }
        let submitted = &claims[..claims.len().min(MAX_SUBMITTED_CLAIMS)];

        let Some(provider) = &self.provider else {
            return submitted
                .iter()
                .map(VerificationResult::not_configured)
                .collect();
        };

        let mut results = Vec::with_capacity(submitted.len());
        for (index, claim) in submitted.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
            }

            let query = clean_query(claim, MAX_QUERY_CHARS);
            if query.is_empty() {
                debug!(claim, "Cleaned query is empty; skipping lookup");
                results.push(VerificationResult::empty(claim));
                continue;
            }

            match with_retry(&self.config.retry, || provider.search(&query)).await {
                Ok(records) => {
                    let status = aggregate_verdict(&records);
                    debug!(%status, evidence = records.len(), "Claim verified");
                    results.push(VerificationResult {
                        claim: claim.clone(),
                        status,
                        fact_checks: records,
                        error: None,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Fact-check lookup failed");
                    results.push(VerificationResult::api_error(claim, e.to_string()));
                }
            }
        }
        results
    }
}

/// A mock fact-check provider for testing and development.
pub struct MockFactCheckProvider {
    responses: std::sync::Mutex<Vec<Result<Vec<Value>, FactCheckError>>>,
    calls: AtomicUsize,
}

impl MockFactCheckProvider {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider that always answers with the given textual ratings.
    ///
    /// Queues multiple copies of the response so it can handle multiple
    /// lookups.
    pub fn with_ratings(ratings: &[&str]) -> Self {
        let provider = Self::new();
        for _ in 0..20 {
            provider.queue(Ok(ratings.iter().map(|r| Self::rating_record(r)).collect()));
        }
        provider
    }

    /// Queue a response for the next `search` call.
    pub fn queue(&self, response: Result<Vec<Value>, FactCheckError>) {
        self.responses.lock().unwrap().push(response);
    }

    /// A rating record in the service's payload shape.
    pub fn rating_record(rating: &str) -> Value {
        serde_json::json!({
            "text": "a published fact check",
            "claimReview": [{ "textualRating": rating }]
        })
    }

    /// Number of `search` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockFactCheckProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactCheckProvider for MockFactCheckProvider {
    async fn search(&self, _query: &str) -> Result<Vec<Value>, FactCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(Vec::new())
        } else {
            responses.remove(0)
        }
    }

    fn name(&self) -> &str {
        "mock-factcheck"
    }
}
