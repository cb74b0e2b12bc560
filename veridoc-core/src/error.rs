//! Error types for the Veridoc analysis core.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the analysis gate, citation parsing, fact checking,
//! summarization, and configuration domains.
//!
//! Only [`AnalysisError::TextTooShort`] ever reaches a caller of the
//! pipeline; every other failure is recovered at its stage boundary and
//! converted into the documented fallback value.

/// Top-level error type for the Veridoc core library.
#[derive(Debug, thiserror::Error)]
pub enum VeridocError {
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Citation error: {0}")]
    Citation(#[from] CitationError),

    #[error("Fact-check error: {0}")]
    FactCheck(#[from] FactCheckError),

    #[error("Summarization error: {0}")]
    Summarize(#[from] SummarizeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the analysis pipeline entry gate.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Document text too short: {length} chars after trimming (minimum {minimum})")]
    TextTooShort { length: usize, minimum: usize },

    #[error("Analysis stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },
}

/// Errors from citation parsing.
///
/// These never escape `validate_citations`; they exist so the parser can
/// report *which* phase broke before the caller degrades to the error
/// placeholder.
#[derive(Debug, thiserror::Error)]
pub enum CitationError {
    #[error("Reference block chunking failed: {message}")]
    Chunking { message: String },

    #[error("Entry field extraction failed: {message}")]
    Extraction { message: String },
}

/// Errors from the external fact-check service interaction.
#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    #[error("Fact-check not configured (no service account or API key)")]
    NotConfigured,

    #[error("API request failed: {message}")]
    ApiRequest { message: String },

    #[error("API response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Rate limited by service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Authentication rejected: {message}")]
    AuthFailed { message: String },

    #[error("Connection failed: {message}")]
    Connection { message: String },
}

/// Errors from the summarization capability.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Summarizer backend error: {message}")]
    Backend { message: String },

    #[error("No summary produced from any chunk")]
    Empty,
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level [`VeridocError`].
pub type Result<T> = std::result::Result<T, VeridocError>;

impl FactCheckError {
    /// Whether the error is transient and worth retrying.
    ///
    /// Auth and parse failures are permanent; retrying them only burns
    /// the external service's rate budget.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FactCheckError::ApiRequest { .. }
                | FactCheckError::RateLimited { .. }
                | FactCheckError::Timeout { .. }
                | FactCheckError::Connection { .. }
        )
    }
}
