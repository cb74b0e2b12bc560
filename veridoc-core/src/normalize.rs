//! Result normalization: the fixed contract between analysis stages and
//! the assembled report.
//!
//! Every function here is pure and total: no panics, no I/O. Whatever
//! shape a stage hands over (well-formed object, bare legacy number,
//! garbage, nothing), the caller gets a type-correct envelope with
//! defaults substituted for anything missing or malformed.

use serde_json::Value;
use tracing::warn;

use crate::types::{
    CitationCandidate, CitationEntry, FactEntry, PlagiarismResult, VerdictStatus,
    VerificationResult,
};

/// Tagged union of the shapes a plagiarism score can arrive in.
///
/// The scorer proper returns a full report object, the legacy path returns
/// a bare percent, and a degraded stage returns nothing at all; each shape
/// has its own deterministic coercion into [`PlagiarismResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawScore {
    /// Full result object: score plus matching sources.
    Report { score: f64, sources: Vec<Value> },
    /// Bare ratio already in [0, 1].
    Ratio(f64),
    /// Legacy percent form in (1, 100].
    Percent(f64),
    /// Nothing usable.
    Absent,
}

impl RawScore {
    /// Classify an arbitrary value into one of the expected shapes.
    pub fn classify(value: &Value) -> Self {
        match value {
            Value::Object(map) => RawScore::Report {
                score: map
                    .get("plagiarism_score")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                sources: map
                    .get("matching_sources")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
            },
            Value::Number(n) => {
                let v = n.as_f64().unwrap_or(0.0);
                if v > 1.0 {
                    RawScore::Percent(v)
                } else {
                    RawScore::Ratio(v)
                }
            }
            _ => RawScore::Absent,
        }
    }

    /// Coerce into the fixed envelope.
    pub fn into_result(self) -> PlagiarismResult {
        match self {
            RawScore::Report { score, sources } => PlagiarismResult {
                plagiarism_score: score,
                matching_sources: sources,
            },
            RawScore::Ratio(v) => PlagiarismResult {
                plagiarism_score: v,
                matching_sources: Vec::new(),
            },
            RawScore::Percent(v) => PlagiarismResult {
                plagiarism_score: v / 100.0,
                matching_sources: Vec::new(),
            },
            RawScore::Absent => PlagiarismResult::zero(),
        }
    }
}

/// Normalize any plagiarism-stage output into the fixed envelope.
pub fn plagiarism_envelope(value: &Value) -> PlagiarismResult {
    RawScore::classify(value).into_result()
}

/// Keep only the object-shaped items of a would-be list.
pub fn object_items(value: &Value) -> Vec<Value> {
    value
        .as_array()
        .map(|items| items.iter().filter(|v| v.is_object()).cloned().collect())
        .unwrap_or_default()
}

/// Coerce one citation-shaped value into a report row.
pub fn citation_entry(value: &Value) -> CitationEntry {
    let Some(map) = value.as_object() else {
        return CitationEntry {
            reference: "Unknown".to_string(),
            valid: false,
        };
    };

    let reference = ["raw", "cleaned_title", "reference"]
        .iter()
        .find_map(|key| {
            map.get(*key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("Unknown citation");
    let valid = map.get("valid").and_then(Value::as_bool).unwrap_or(false);

    CitationEntry {
        reference: reference.to_string(),
        valid,
    }
}

/// Coerce one fact-check-shaped value into a report row, remapping the
/// status for downstream display.
pub fn fact_entry(value: &Value) -> FactEntry {
    let Some(map) = value.as_object() else {
        return FactEntry {
            claim: "Unknown claim".to_string(),
            status: "Unverified".to_string(),
        };
    };

    let claim = map
        .get("claim")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("Unknown claim");
    let status_raw = map
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("no_verdict");

    FactEntry {
        claim: claim.to_string(),
        status: user_facing_status(status_raw).to_string(),
    }
}

/// Typed counterpart of [`citation_entry`] for in-process candidates:
/// reference falls back from raw text to title to a fixed placeholder.
pub fn citation_row(candidate: &CitationCandidate) -> CitationEntry {
    let reference = if !candidate.raw.is_empty() {
        candidate.raw.as_str()
    } else if !candidate.cleaned_title.is_empty() {
        candidate.cleaned_title.as_str()
    } else {
        "Unknown citation"
    };
    CitationEntry {
        reference: reference.to_string(),
        valid: candidate.valid,
    }
}

/// Typed counterpart of [`fact_entry`] for in-process results.
pub fn fact_row(result: &VerificationResult) -> FactEntry {
    let claim = if result.claim.is_empty() {
        "Unknown claim"
    } else {
        result.claim.as_str()
    };
    FactEntry {
        claim: claim.to_string(),
        status: status_label(result.status).to_string(),
    }
}

/// User-facing remap of a raw status string. Anything unrecognized,
/// `api_error` included, reads as "Unverified".
pub fn user_facing_status(raw: &str) -> &'static str {
    match raw {
        "verified" => "Verified",
        "contradicted" => "Contradicted",
        _ => "Unverified",
    }
}

/// Typed variant of [`user_facing_status`] for in-process results.
pub fn status_label(status: VerdictStatus) -> &'static str {
    match status {
        VerdictStatus::Verified => "Verified",
        VerdictStatus::Contradicted => "Contradicted",
        VerdictStatus::NoVerdict | VerdictStatus::ApiError => "Unverified",
    }
}

/// Call-and-capture wrapper: invoke a fallible unary operation, returning
/// `None` instead of propagating its failure so the caller can chain the
/// documented fallback.
pub fn capture<A, T, E>(stage: &str, op: impl FnOnce(A) -> Result<T, E>, arg: A) -> Option<T>
where
    E: std::fmt::Display,
{
    match op(arg) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(stage, error = %e, "Stage failed; substituting fallback");
            None
        }
    }
}
