//! Heuristic, offline plagiarism scoring.
//!
//! Measures internal repetition via 7-token shingles as a cheap proxy for
//! copy-paste structure. No external reference corpus is consulted, so
//! `matching_sources` stays empty; the field is reserved for a future
//! corpus-matching stage.

use std::collections::HashMap;

use tracing::info;

use crate::text::{shingles, split_sentences, tokenize};
use crate::types::PlagiarismResult;

/// Shingle width in tokens.
const SHINGLE_WIDTH: usize = 7;
/// Minimum text length (chars) before scoring is meaningful.
const MIN_TEXT_CHARS: usize = 200;
/// Minimum number of substantial sentences before scoring is meaningful.
const MIN_SENTENCES: usize = 5;
/// A sentence must be longer than this many chars to count as substantial.
const MIN_SENTENCE_CHARS: usize = 25;

/// Score internal repetition in `text`.
///
/// Texts below the preconditions (length, substantial-sentence count) get
/// score 0.0 with empty sources rather than an error. Deterministic for a
/// given input.
pub fn score_text(text: &str) -> PlagiarismResult {
    if text.chars().count() < MIN_TEXT_CHARS {
        return PlagiarismResult::zero();
    }

    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect();
    if sentences.len() < MIN_SENTENCES {
        return PlagiarismResult::zero();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for sentence in &sentences {
        let tokens = tokenize(sentence);
        for shingle in shingles(&tokens, SHINGLE_WIDTH) {
            *counts.entry(shingle).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    let duplicated: usize = counts.values().filter(|&&c| c > 1).map(|&c| c - 1).sum();
    let score = if total == 0 {
        0.0
    } else {
        (duplicated as f64 / total as f64).clamp(0.0, 1.0)
    };

    info!(score, sentences = sentences.len(), "Heuristic plagiarism score");
    PlagiarismResult {
        plagiarism_score: score,
        matching_sources: Vec::new(),
    }
}

/// Legacy percent form of the score, rounded to [0, 100].
pub fn score_percent(text: &str) -> u32 {
    (100.0 * score_text(text).plagiarism_score).round() as u32
}
