//! Core data model for the analysis pipeline.
//!
//! Stage outputs (`PlagiarismResult`, `CitationCandidate`,
//! `VerificationResult`) keep the raw shapes the stages produce; the report
//! envelopes (`AnalysisReport` and friends) are the fixed downstream contract
//! every stage result is coerced into by `normalize`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Extracted document text and metadata, as supplied by the upstream text
/// extraction collaborator. The core treats all three fields as opaque input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Full extracted text.
    pub text: String,
    /// Word count reported by the extractor.
    pub word_count: usize,
    /// Document title (or filename fallback).
    pub title: String,
}

impl ExtractedDocument {
    /// Build a document from raw text, deriving the word count.
    ///
    /// For callers that have only the text (e.g. the CLI reading a plain
    /// file) rather than a full extraction result.
    pub fn from_text(text: impl Into<String>, title: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = text.split_whitespace().count();
        Self {
            text,
            word_count,
            title: title.into(),
        }
    }
}

/// Result of the internal-repetition plagiarism scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagiarismResult {
    /// Repetition score in [0, 1].
    pub plagiarism_score: f64,
    /// Matching source descriptors. Always empty in the offline heuristic;
    /// reserved for a future corpus-matching stage.
    pub matching_sources: Vec<Value>,
}

impl PlagiarismResult {
    /// The zero result returned for texts below the scoring preconditions.
    pub fn zero() -> Self {
        Self {
            plagiarism_score: 0.0,
            matching_sources: Vec::new(),
        }
    }
}

/// A citation candidate produced by the reference block parser.
///
/// `valid` means "has a checkable identifier (DOI or URL)": a structural
/// heuristic, not a verified-correct citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationCandidate {
    /// Raw entry or in-text match text.
    pub raw: String,
    /// Best-effort title guess. Empty for in-text matches.
    pub cleaned_title: String,
    /// First DOI found in the entry, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// First URL found in the entry, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// True iff a DOI or URL is present.
    pub valid: bool,
}

impl CitationCandidate {
    /// Candidate for an in-text match: no title, no identifiers.
    pub fn intext(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            cleaned_title: String::new(),
            doi: None,
            url: None,
            valid: false,
        }
    }

    /// Placeholder emitted when a non-empty document yields no candidates,
    /// so downstream consumers never see an empty collection.
    pub fn unavailable() -> Self {
        Self {
            raw: "Mock Citation (API not configured)".to_string(),
            cleaned_title: "Citation validation not available".to_string(),
            doi: None,
            url: None,
            valid: false,
        }
    }

    /// Placeholder emitted when parsing failed unexpectedly.
    pub fn parse_error() -> Self {
        Self {
            raw: "Citation validation error".to_string(),
            cleaned_title: "Unable to validate citations".to_string(),
            doi: None,
            url: None,
            valid: false,
        }
    }
}

/// Coarse verdict assigned to a claim after verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// Truthy rating signals strictly outnumber falsy ones.
    Verified,
    /// Falsy rating signals strictly outnumber truthy ones.
    Contradicted,
    /// Tie, no signals, or verification not attempted.
    NoVerdict,
    /// The external call itself failed.
    ApiError,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictStatus::Verified => write!(f, "verified"),
            VerdictStatus::Contradicted => write!(f, "contradicted"),
            VerdictStatus::NoVerdict => write!(f, "no_verdict"),
            VerdictStatus::ApiError => write!(f, "api_error"),
        }
    }
}

/// Verification outcome for a single claim.
///
/// Invariant: `status == ApiError` iff the external call failed; otherwise
/// the status is derived purely from `fact_checks` by verdict aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// The claim that was checked.
    pub claim: String,
    /// Aggregated verdict.
    pub status: VerdictStatus,
    /// Raw rating records from the service payload, in response order.
    pub fact_checks: Vec<Value>,
    /// Failure or explanation message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// Result for a claim that was never submitted because no credential
    /// is configured.
    pub fn not_configured(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            status: VerdictStatus::NoVerdict,
            fact_checks: Vec::new(),
            error: Some("Fact-check not configured (no service account or API key)".to_string()),
        }
    }

    /// Empty result for a claim whose cleaned query was empty.
    pub fn empty(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            status: VerdictStatus::NoVerdict,
            fact_checks: Vec::new(),
            error: None,
        }
    }

    /// Result for a claim whose verification call failed after all retries.
    pub fn api_error(claim: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            status: VerdictStatus::ApiError,
            fact_checks: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// A citation row in the assembled report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEntry {
    pub reference: String,
    pub valid: bool,
}

/// A fact-check row in the assembled report. `status` carries the
/// user-facing remap ("Verified" / "Contradicted" / "Unverified").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactEntry {
    pub claim: String,
    pub status: String,
}

/// Fact-check section of the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactCheckSection {
    pub facts: Vec<FactEntry>,
}

/// Aggregate counters for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub word_count: usize,
    pub plagiarism_percent: f64,
    pub citations_count: usize,
    pub fact_checks_count: usize,
}

/// The assembled analysis report: always structurally complete, whatever
/// subset of stages degraded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Report identity.
    pub id: Uuid,
    /// When the analysis ran.
    pub generated_at: DateTime<Utc>,
    /// Document summary, or the degradation placeholder.
    pub summary: String,
    /// Plagiarism score in [0, 1].
    pub plagiarism: f64,
    /// Matching source descriptors (empty in offline mode).
    pub plagiarism_details: Vec<Value>,
    /// Citation rows.
    pub citations: Vec<CitationEntry>,
    /// Fact-check section.
    pub fact_check: FactCheckSection,
    /// Aggregate counters.
    pub stats: ReportStats,
}
