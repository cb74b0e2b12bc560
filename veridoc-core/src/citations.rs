//! Citation extraction and structural validation.
//!
//! Locates a references/bibliography section, segments it into entries, and
//! pulls out per-entry identifiers (DOI, URL) plus a best-effort title. Also
//! detects APA-style and numeric in-text citation markers across the whole
//! document.
//!
//! The public entry point never fails: a document with no citations yields a
//! single "validation not available" placeholder, and an unexpected parse
//! failure degrades to a single "validation error" placeholder.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::CitationError;
use crate::types::CitationCandidate;

/// Entries shorter than this (after line joining) are discarded as noise.
const MIN_ENTRY_CHARS: usize = 20;
/// Last-resort title guess length.
const TITLE_FALLBACK_CHARS: usize = 120;

/// Reference parser with its citation patterns compiled once.
pub struct ReferenceParser {
    doi: Regex,
    url: Regex,
    // APA-like in-text: (Author, 2017) or (Author & Author, 2019)
    apa_intext: Regex,
    // Numeric in-text: [12] or [1,2,3]
    num_intext: Regex,
    section_head: Regex,
    next_section: Regex,
    ieee_marker: Regex,
    quoted_title: Regex,
    year_title: Regex,
    segment_split: Regex,
}

impl ReferenceParser {
    pub fn new() -> Self {
        Self {
            doi: Regex::new(r"(?i)\b10\.\d{4,9}/[-._;()/:A-Z0-9]+\b").unwrap(),
            url: Regex::new(r#"(?i)https?://[^\s<>")]+"#).unwrap(),
            apa_intext: Regex::new(
                r"\(([A-Z][A-Za-z\-]+(?:\s*&\s*[A-Z][A-Za-z\-]+)?(?:,\s*[A-Z][A-Za-z\-]+)*)\s*,\s*(\d{4}[a-z]?)\)",
            )
            .unwrap(),
            num_intext: Regex::new(r"\[(\d+(?:\s*,\s*\d+)*)\]").unwrap(),
            section_head: Regex::new(r"(?i)^\s*(references|bibliography|works\s+cited)\s*$")
                .unwrap(),
            next_section: Regex::new(r"^[A-Z][A-Z0-9 ._-]{3,}$").unwrap(),
            ieee_marker: Regex::new(r"^\[\d+\]\s+").unwrap(),
            quoted_title: Regex::new(r#""([^"]+)"|“([^”]+)”"#).unwrap(),
            year_title: Regex::new(r"\((\d{4}[a-z]?)\)\.?\s*(.+?)\.").unwrap(),
            segment_split: Regex::new(r"\.\s+").unwrap(),
        }
    }

    /// Parse all citation candidates out of `text`.
    ///
    /// Ordering: bibliography entries first (document order), then APA
    /// in-text matches, then numeric in-text matches. The heuristic field
    /// extraction is total; the `Result` is the stage's degradation
    /// boundary for future fallible phases.
    pub fn parse(&self, text: &str) -> Result<Vec<CitationCandidate>, CitationError> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let block = self.find_references_block(&lines);
        let entries = self.chunk_references(&block);

        let mut results = Vec::new();

        for entry in &entries {
            let doi = self.doi.find(entry).map(|m| m.as_str().to_string());
            let url = self.url.find(entry).map(|m| m.as_str().to_string());
            let title = self.title_guess(entry);
            let valid = doi.is_some() || url.is_some();
            results.push(CitationCandidate {
                raw: entry.clone(),
                cleaned_title: title,
                doi,
                url,
                valid,
            });
        }

        for m in self.apa_intext.find_iter(text) {
            results.push(CitationCandidate::intext(m.as_str()));
        }
        for m in self.num_intext.find_iter(text) {
            results.push(CitationCandidate::intext(m.as_str()));
        }

        debug!(
            entries = entries.len(),
            total = results.len(),
            "Citations parsed"
        );
        Ok(results)
    }

    /// Lines belonging to the references section, blank lines included
    /// (entry chunking needs them). Empty when no section heading exists.
    fn find_references_block<'a>(&self, lines: &[&'a str]) -> Vec<&'a str> {
        let Some(start) = lines.iter().position(|ln| self.section_head.is_match(ln)) else {
            return Vec::new();
        };

        let mut block = Vec::new();
        for &ln in &lines[start + 1..] {
            if ln.is_empty() {
                block.push(ln);
                continue;
            }
            // Next ALL-CAPS section header ends the block: APPENDIX A,
            // SUPPLEMENTARY MATERIAL, etc.
            let words = ln.split_whitespace().count();
            if self.next_section.is_match(ln) && (2..=6).contains(&words) {
                break;
            }
            block.push(ln);
        }
        block
    }

    /// Group block lines into entry strings. A boundary is a blank line or
    /// a `[n]`-prefixed line (IEEE numbering); inner lines are joined with
    /// single spaces. Short leftovers are dropped as noise.
    fn chunk_references(&self, block: &[&str]) -> Vec<String> {
        let mut entries: Vec<String> = Vec::new();
        let mut buf: Vec<&str> = Vec::new();

        let flush = |buf: &mut Vec<&str>, entries: &mut Vec<String>| {
            if !buf.is_empty() {
                entries.push(buf.join(" ").trim().to_string());
                buf.clear();
            }
        };

        for &ln in block {
            if ln.is_empty() || self.ieee_marker.is_match(ln) {
                flush(&mut buf, &mut entries);
                if !ln.is_empty() {
                    buf.push(ln);
                }
            } else {
                buf.push(ln);
            }
        }
        flush(&mut buf, &mut entries);

        entries
            .into_iter()
            .filter(|e| e.chars().count() >= MIN_ENTRY_CHARS)
            .collect()
    }

    /// Best-effort title guess: quoted span, then text between a
    /// parenthesized year and the next period, then the second
    /// period-delimited segment of the identifier-stripped entry.
    fn title_guess(&self, entry: &str) -> String {
        let cleaned = self.doi.replace_all(entry, "");
        let cleaned = self.url.replace_all(&cleaned, "").to_string();

        if let Some(caps) = self.quoted_title.captures(&cleaned) {
            if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
                return m.as_str().trim().to_string();
            }
        }

        if let Some(caps) = self.year_title.captures(&cleaned) {
            if let Some(m) = caps.get(2) {
                return m.as_str().trim().to_string();
            }
        }

        let segments: Vec<&str> = self
            .segment_split
            .split(&cleaned)
            .map(str::trim)
            .filter(|s| s.chars().count() > 5)
            .collect();
        match segments.len() {
            0 => cleaned.chars().take(TITLE_FALLBACK_CHARS).collect(),
            1 => segments[0].to_string(),
            _ => segments[1].to_string(),
        }
    }
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::new()
    }
}

static PARSER: LazyLock<ReferenceParser> = LazyLock::new(ReferenceParser::new);

/// Parse citations with the shared parser, degrading every failure mode to
/// a placeholder so the caller always gets a well-formed list.
///
/// - empty/whitespace input: empty list;
/// - non-empty input, no candidates: one "not available" placeholder;
/// - parse failure: one "validation error" placeholder.
pub fn validate_citations(text: &str) -> Vec<CitationCandidate> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match PARSER.parse(text) {
        Ok(results) if results.is_empty() => vec![CitationCandidate::unavailable()],
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, "Citation validation failed");
            vec![CitationCandidate::parse_error()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "\
Intro text citing prior work (Smith, 2020) and results [3].

References
[1] Smith, J. (2020). \"A Study.\" Journal X. https://doi.org/10.1000/xyz123
[2] Jones, A. & Brown, B. (2019). Another Study of Things. Nature.

APPENDIX A
Extra material here.";

    #[test]
    fn test_bibliography_entries_come_first() {
        let results = validate_citations(PAPER);
        assert!(results.len() >= 2);
        assert!(results[0].raw.starts_with("[1] Smith"));
        assert!(results[1].raw.starts_with("[2] Jones"));
    }

    #[test]
    fn test_doi_and_url_extraction() {
        let results = validate_citations(PAPER);
        let first = &results[0];
        assert_eq!(first.doi.as_deref(), Some("10.1000/xyz123"));
        assert_eq!(
            first.url.as_deref(),
            Some("https://doi.org/10.1000/xyz123")
        );
        assert!(first.valid);
    }

    #[test]
    fn test_quoted_title_wins() {
        let results = validate_citations(PAPER);
        assert_eq!(results[0].cleaned_title, "A Study.");
    }

    #[test]
    fn test_year_period_title_guess() {
        let results = validate_citations(PAPER);
        assert_eq!(results[1].cleaned_title, "Another Study of Things");
        assert!(!results[1].valid);
    }

    #[test]
    fn test_block_ends_at_next_section_header() {
        let results = validate_citations(PAPER);
        assert!(results.iter().all(|c| !c.raw.contains("Extra material")));
    }

    #[test]
    fn test_intext_candidates_follow_entries() {
        let results = validate_citations(PAPER);
        let apa: Vec<_> = results.iter().filter(|c| c.raw.contains("Smith, 2020")).collect();
        assert_eq!(apa.len(), 1);
        assert!(!apa[0].valid);
        assert!(apa[0].cleaned_title.is_empty());
        // Numeric matches include the in-text [3] and the IEEE markers.
        assert!(results.iter().any(|c| c.raw == "[3]"));
    }

    #[test]
    fn test_no_heading_means_no_entries() {
        let text = "A paper citing (Kim, 2018) but with no reference section at all.";
        let results = validate_citations(text);
        assert!(results.iter().all(|c| c.cleaned_title.is_empty()));
        assert!(results.iter().any(|c| c.raw == "(Kim, 2018)"));
    }

    #[test]
    fn test_empty_text_yields_empty_list() {
        assert!(validate_citations("").is_empty());
        assert!(validate_citations("   \n ").is_empty());
    }

    #[test]
    fn test_placeholder_for_citation_free_document() {
        let results = validate_citations("Plain prose with nothing citable in it whatsoever.");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cleaned_title, "Citation validation not available");
        assert!(!results[0].valid);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = validate_citations(PAPER);
        let second = validate_citations(PAPER);
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_line_chunking_without_ieee_markers() {
        let text = "Works Cited\n\
            Doe, J. (2021). Deep Results. Journal Y.\n\
            Second line of the same entry.\n\
            \n\
            Roe, R. (2022). Other Results. Journal Z.";
        let results = validate_citations(text);
        let entries: Vec<_> = results.iter().filter(|c| !c.cleaned_title.is_empty()).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].raw.contains("Second line of the same entry"));
    }

    #[test]
    fn test_short_entries_are_discarded() {
        let text = "References\nTiny ref.\n\nA proper reference entry that is long enough to keep (2019). Title Here. Venue.";
        let results = validate_citations(text);
        assert!(results.iter().all(|c| !c.raw.contains("Tiny ref")));
    }

    #[test]
    fn test_single_word_caps_line_does_not_terminate() {
        let text = "References\n[1] Smith, J. (2020). \"A Study.\" Journal X.\nRESULTS\n[2] Jones, A. (2019). \"More.\" Journal Y. Published in full.";
        let results = validate_citations(text);
        // RESULTS is one word; the block continues past it.
        assert!(results.iter().any(|c| c.raw.contains("Jones")));
    }

    #[test]
    fn test_degrades_to_error_placeholder() {
        let degraded = match Err::<Vec<CitationCandidate>, _>(CitationError::Chunking {
            message: "boom".into(),
        }) {
            Ok(results) => results,
            Err(_) => vec![CitationCandidate::parse_error()],
        };
        assert_eq!(degraded.len(), 1);
        assert_eq!(degraded[0].cleaned_title, "Unable to validate citations");
    }
}
