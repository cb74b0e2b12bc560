//! Document summarization seam.
//!
//! The neural summarization model is an external capability; the core only
//! depends on the unary text-to-summary contract expressed by the
//! [`Summarizer`] trait. The offline [`HeuristicSummarizer`] keeps the
//! pipeline useful when no model backend is wired up, and the orchestrator
//! degrades any summarizer failure to [`SUMMARY_UNAVAILABLE`].

use async_trait::async_trait;

use crate::error::SummarizeError;
use crate::text::split_sentences;

/// Placeholder the pipeline substitutes when summarization fails.
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate summary.";
/// Returned for texts too short to be worth compressing.
pub const SUMMARY_TOO_SHORT: &str = "Document too short to summarize effectively.";

/// Minimum trimmed text length before summarization is attempted.
const MIN_SUMMARIZABLE_CHARS: usize = 100;
/// Selection budget for the heuristic summarizer.
const MAX_SUMMARY_WORDS: usize = 200;
const MAX_SUMMARY_SENTENCES: usize = 7;

/// Keywords that mark a sentence as carrying the document's substance.
const IMPORTANT_KEYWORDS: [&str; 17] = [
    "study",
    "result",
    "method",
    "conclude",
    "finding",
    "research",
    "analysis",
    "experiment",
    "data",
    "significant",
    "demonstrate",
    "propose",
    "novel",
    "approach",
    "framework",
    "model",
    "algorithm",
];

/// Unary text-to-summary capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a summary of the text.
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError>;

    /// Backend label for logs.
    fn name(&self) -> &str;
}

/// Offline extractive summarizer: scores sentences by keyword density,
/// length band, and document position, then keeps the best few in
/// document order.
pub struct HeuristicSummarizer;

impl HeuristicSummarizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for HeuristicSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, SummarizeError> {
        if text.trim().chars().count() < MIN_SUMMARIZABLE_CHARS {
            return Ok(SUMMARY_TOO_SHORT.to_string());
        }
        let summary = heuristic_summary(text);
        if summary.is_empty() {
            return Err(SummarizeError::Empty);
        }
        Ok(summary)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Score and select important sentences. Pure and deterministic.
pub fn heuristic_summary(text: &str) -> String {
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > 10)
        .collect();
    if sentences.is_empty() {
        return String::new();
    }

    let total = sentences.len();
    let mut scored: Vec<(usize, i32, usize)> = Vec::new();
    for (idx, sentence) in sentences.iter().enumerate() {
        let word_count = sentence.split_whitespace().count();
        if word_count < 5 {
            continue;
        }

        let mut score = 0i32;
        if (15..=30).contains(&word_count) {
            score += 2;
        } else if (10..=40).contains(&word_count) {
            score += 1;
        }

        let lower = sentence.to_lowercase();
        for keyword in IMPORTANT_KEYWORDS {
            if lower.contains(keyword) {
                score += 1;
            }
        }

        // Openings and conclusions tend to carry the thesis.
        if idx < total / 5 || idx > total * 4 / 5 {
            score += 1;
        }

        scored.push((idx, score, word_count));
    }

    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut selected: Vec<usize> = Vec::new();
    let mut total_words = 0usize;
    for &(idx, _, word_count) in &scored {
        if total_words + word_count <= MAX_SUMMARY_WORDS {
            selected.push(idx);
            total_words += word_count;
        }
        if selected.len() >= MAX_SUMMARY_SENTENCES || total_words >= MAX_SUMMARY_WORDS - 20 {
            break;
        }
    }
    if selected.is_empty() {
        selected = (0..sentences.len().min(3)).collect();
    }

    selected.sort_unstable();
    selected
        .into_iter()
        .map(|idx| sentences[idx].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A mock summarizer for testing and development.
pub struct MockSummarizer {
    responses: std::sync::Mutex<Vec<Result<String, SummarizeError>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A summarizer that always returns the given text.
    pub fn with_response(text: &str) -> Self {
        let mock = Self::new();
        for _ in 0..20 {
            mock.queue(Ok(text.to_string()));
        }
        mock
    }

    /// A summarizer whose every call fails.
    pub fn failing() -> Self {
        let mock = Self::new();
        for _ in 0..20 {
            mock.queue(Err(SummarizeError::Backend {
                message: "mock summarizer failure".to_string(),
            }));
        }
        mock
    }

    /// Queue a response for the next `summarize` call.
    pub fn queue(&self, response: Result<String, SummarizeError>) {
        self.responses.lock().unwrap().push(response);
    }
}

impl Default for MockSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _text: &str) -> Result<String, SummarizeError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("Mock summary.".to_string())
        } else {
            responses.remove(0)
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn research_text() -> String {
        "This study examines long-term rainfall variation across the continent with care. \
         The sky was grey that morning and nobody paid it much attention at all. \
         Our analysis of the data shows a significant downward trend in every region. \
         Some towns have markets on Sundays. \
         We conclude that the finding holds across each of the studied decades robustly. \
         Further research should examine the proposed framework in coastal settings too."
            .to_string()
    }

    #[tokio::test]
    async fn test_short_text_gets_placeholder() {
        let summarizer = HeuristicSummarizer::new();
        let result = summarizer.summarize("Brief.").await.unwrap();
        assert_eq!(result, SUMMARY_TOO_SHORT);
    }

    #[tokio::test]
    async fn test_summary_prefers_keyword_sentences() {
        let summarizer = HeuristicSummarizer::new();
        let summary = summarizer.summarize(&research_text()).await.unwrap();
        assert!(summary.contains("analysis of the data"));
        assert!(summary.contains("We conclude"));
    }

    #[test]
    fn test_summary_preserves_document_order() {
        let summary = heuristic_summary(&research_text());
        let study = summary.find("This study").unwrap_or(usize::MAX);
        let conclude = summary.find("We conclude");
        if let Some(conclude) = conclude {
            assert!(study < conclude);
        }
    }

    #[test]
    fn test_summary_bounded() {
        let long: String = (0..120)
            .map(|i| {
                format!(
                    "Sentence number {i} reports one more result from the research data analysis. "
                )
            })
            .collect();
        let summary = heuristic_summary(&long);
        assert!(summary.split_whitespace().count() <= MAX_SUMMARY_WORDS + 40);
    }

    #[test]
    fn test_summary_deterministic() {
        let text = research_text();
        assert_eq!(heuristic_summary(&text), heuristic_summary(&text));
    }

    #[test]
    fn test_empty_text_empty_summary() {
        assert_eq!(heuristic_summary(""), String::new());
    }

    #[tokio::test]
    async fn test_fragment_only_text_errors_empty() {
        // Long enough to attempt, but no sentence survives the length gate.
        let text = "a. b. c. ".repeat(15);
        let summarizer = HeuristicSummarizer::new();
        let result = summarizer.summarize(&text).await;
        assert!(matches!(result, Err(SummarizeError::Empty)));
    }

    #[tokio::test]
    async fn test_mock_summarizer_responses() {
        let mock = MockSummarizer::with_response("canned");
        assert_eq!(mock.summarize("anything").await.unwrap(), "canned");

        let failing = MockSummarizer::failing();
        assert!(failing.summarize("anything").await.is_err());
    }
}
