//! # Veridoc Core
//!
//! Core library for the Veridoc document-integrity analyzer.
//! Provides the analysis pipeline: plagiarism scoring, citation parsing,
//! claim extraction, external fact checking, summarization, and the result
//! normalization that keeps the assembled report well-formed whatever any
//! single stage does.

pub mod citations;
pub mod claims;
pub mod config;
pub mod error;
pub mod factcheck;
pub mod normalize;
pub mod pipeline;
pub mod plagiarism;
pub mod sanitize;
pub mod summarizer;
pub mod text;
pub mod types;

// Re-export commonly used types at the crate root.
pub use config::{AnalysisConfig, ClaimsConfig, FactCheckConfig, RetryConfig, load_config};
pub use error::{
    AnalysisError, CitationError, ConfigError, FactCheckError, Result, SummarizeError,
    VeridocError,
};
pub use factcheck::{
    FactCheckClient, FactCheckProvider, GoogleFactCheckProvider, MockFactCheckProvider,
};
pub use pipeline::DocumentAnalyzer;
pub use summarizer::{HeuristicSummarizer, MockSummarizer, SUMMARY_UNAVAILABLE, Summarizer};
pub use types::{
    AnalysisReport, CitationCandidate, CitationEntry, ExtractedDocument, FactCheckSection,
    FactEntry, PlagiarismResult, ReportStats, VerdictStatus, VerificationResult,
};
