//! Pipeline orchestration.
//!
//! Runs every analysis stage over one extracted document and assembles the
//! normalized report. Stages are independent; each one's failure degrades
//! to its documented default at the stage boundary, so a single failing
//! dependency only blanks its own section of the report. The only error a
//! caller ever sees is the input-rejection gate.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::citations::validate_citations;
use crate::claims::extract_claims;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::factcheck::FactCheckClient;
use crate::normalize;
use crate::plagiarism;
use crate::summarizer::{HeuristicSummarizer, SUMMARY_UNAVAILABLE, Summarizer};
use crate::types::{
    AnalysisReport, CitationCandidate, ExtractedDocument, FactCheckSection, PlagiarismResult,
    ReportStats, VerificationResult,
};

/// Minimum trimmed document length before any stage runs.
const MIN_DOCUMENT_CHARS: usize = 100;

/// Orchestrates the analysis stages for one document at a time.
pub struct DocumentAnalyzer {
    config: AnalysisConfig,
    summarizer: Arc<dyn Summarizer>,
    factcheck: FactCheckClient,
}

impl DocumentAnalyzer {
    /// Build an analyzer from configuration, with the offline heuristic
    /// summarizer and a fact-check client resolved from the config's
    /// credentials.
    pub fn new(config: AnalysisConfig) -> Self {
        let factcheck = FactCheckClient::from_config(&config.factcheck);
        Self {
            summarizer: Arc::new(HeuristicSummarizer::new()),
            factcheck,
            config,
        }
    }

    /// Attach an external summarizer backend. Ignored when the
    /// configuration pins summarization to the offline heuristic.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        if self.config.summary.use_external {
            self.summarizer = summarizer;
        }
        self
    }

    /// Replace the fact-check client.
    pub fn with_factcheck(mut self, client: FactCheckClient) -> Self {
        self.factcheck = client;
        self
    }

    /// Analyze one document and return the assembled report.
    ///
    /// Rejects documents whose trimmed text is under 100 chars before any
    /// stage runs; past that gate the report is always structurally
    /// complete.
    pub async fn analyze(
        &self,
        doc: &ExtractedDocument,
    ) -> Result<AnalysisReport, AnalysisError> {
        let trimmed_len = doc.text.trim().chars().count();
        if trimmed_len < MIN_DOCUMENT_CHARS {
            return Err(AnalysisError::TextTooShort {
                length: trimmed_len,
                minimum: MIN_DOCUMENT_CHARS,
            });
        }

        info!(
            title = doc.title.as_str(),
            words = doc.word_count,
            "Running document analysis"
        );

        let summary = match self.summarizer.summarize(&doc.text).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, backend = self.summarizer.name(), "Summarization failed");
                SUMMARY_UNAVAILABLE.to_string()
            }
        };

        let plagiarism = self.run_plagiarism(&doc.text);
        let citations = validate_citations(&doc.text);

        let claims = extract_claims(&doc.text, &self.config.claims);
        let fact_checks = if claims.is_empty() {
            Vec::new()
        } else {
            self.factcheck.fact_check_claims(&claims).await
        };

        Ok(assemble_report(
            doc,
            summary,
            plagiarism,
            &citations,
            &fact_checks,
        ))
    }

    /// Primary scorer behind the capture boundary, legacy percent form as
    /// the chained fallback, both funneled through the envelope.
    fn run_plagiarism(&self, text: &str) -> PlagiarismResult {
        let raw: Value = match normalize::capture("plagiarism", score_stage, text) {
            Some(result) => serde_json::to_value(result).unwrap_or(Value::Null),
            None => json!(plagiarism::score_percent(text)),
        };
        normalize::plagiarism_envelope(&raw)
    }
}

fn score_stage(text: &str) -> Result<PlagiarismResult, AnalysisError> {
    Ok(plagiarism::score_text(text))
}

/// Assemble the downstream report shape from the stage outputs.
fn assemble_report(
    doc: &ExtractedDocument,
    summary: String,
    plagiarism: PlagiarismResult,
    citations: &[CitationCandidate],
    fact_checks: &[VerificationResult],
) -> AnalysisReport {
    let citation_rows: Vec<_> = citations.iter().map(normalize::citation_row).collect();
    let fact_rows: Vec<_> = fact_checks.iter().map(normalize::fact_row).collect();

    let stats = ReportStats {
        word_count: doc.word_count,
        plagiarism_percent: plagiarism.plagiarism_score,
        citations_count: citation_rows.len(),
        fact_checks_count: fact_rows.len(),
    };

    AnalysisReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        summary,
        plagiarism: plagiarism.plagiarism_score,
        plagiarism_details: plagiarism.matching_sources,
        citations: citation_rows,
        fact_check: FactCheckSection { facts: fact_rows },
        stats,
    }
}
