//! Claim-sentence extraction.
//!
//! Filters document sentences down to a bounded, ordered, duplicate-free
//! set of candidates plausible enough to hand to external verification.
//! Citation-heavy and numeric-noise sentences are unreliable claims and are
//! rejected outright.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ClaimsConfig;
use crate::text::split_sentences;

/// Boilerplate markers: a sentence mentioning any of these is section
/// furniture, not a factual assertion.
const BOILERPLATE_MARKERS: [&str; 6] = [
    "abstract",
    "keywords",
    "references",
    "appendix",
    "figure",
    "table",
];

/// Accepted claim length bounds, in characters (inclusive).
const MIN_CLAIM_CHARS: usize = 40;
const MAX_CLAIM_CHARS: usize = 220;
/// Maximum fraction of digit characters before a sentence counts as
/// numeric noise.
const MAX_DIGIT_DENSITY: f64 = 0.25;

/// Extract up to `config.max_claims` claim-like sentences, in document
/// order, skipping repeats of sentences already selected. Deterministic;
/// no external calls.
pub fn extract_claims(text: &str, config: &ClaimsConfig) -> Vec<String> {
    let mut claims: Vec<String> = Vec::new();
    if text.is_empty() || config.max_claims == 0 {
        return claims;
    }

    let mut seen: HashSet<String> = HashSet::new();
    for sentence in split_sentences(text) {
        if !is_claim_like(&sentence) || !seen.insert(sentence.clone()) {
            continue;
        }
        claims.push(sentence);
        if claims.len() >= config.max_claims {
            break;
        }
    }

    debug!(count = claims.len(), "Extracted claim candidates");
    claims
}

fn is_claim_like(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    if BOILERPLATE_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }

    let len = sentence.chars().count();
    if !(MIN_CLAIM_CHARS..=MAX_CLAIM_CHARS).contains(&len) {
        return false;
    }

    if sentence.ends_with([':', ';']) {
        return false;
    }

    // Citation-heavy sentences: two parenthesis chars or any bracket.
    let paren_count = sentence.chars().filter(|c| matches!(c, '(' | ')')).count();
    if paren_count >= 2 || sentence.chars().any(|c| matches!(c, '[' | ']')) {
        return false;
    }

    let digits = sentence.chars().filter(|c| c.is_ascii_digit()).count();
    if digits as f64 > MAX_DIGIT_DENSITY * len as f64 {
        return false;
    }

    true
}
