//! Text cleaning for outbound fact-check queries.
//!
//! A claim sentence straight out of a document is a poor search query: it
//! drags along citation markers, parentheticals, curly quotes, and control
//! characters from the extraction layer. `clean_query` strips all of that
//! and bounds the query length at a word boundary.

/// Remove control characters, preserving whitespace so word boundaries
/// survive the later collapse.
pub fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !ch.is_control() || ch.is_whitespace())
        .collect()
}

/// Normalize curly quotation marks to their straight ASCII forms.
pub fn straighten_quotes(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' => '"',
            other => other,
        })
        .collect()
}

/// Remove bracketed `[...]` and parenthesized `(...)` spans.
///
/// Spans do not nest; an opener with no matching closer is kept verbatim,
/// matching what a non-greedy pattern would do.
pub fn strip_enclosed_spans(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let closer = match ch {
            '[' => Some(']'),
            '(' => Some(')'),
            _ => None,
        };
        if let Some(closer) = closer {
            if let Some(end) = chars[i + 1..].iter().position(|&c| c == closer) {
                i += end + 2;
                continue;
            }
        }
        out.push(ch);
        i += 1;
    }
    out
}

/// Collapse all whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` bytes, cutting at the last word boundary
/// before the limit when one exists (char-boundary safe either way).
pub fn truncate_at_word_boundary(input: &str, max: usize) -> &str {
    if input.len() <= max {
        return input;
    }
    let mut end = max;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    let head = &input[..end];
    match head.rfind(' ') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head,
    }
}

/// Trim trailing punctuation and whitespace.
pub fn trim_trailing_punctuation(input: &str) -> &str {
    input.trim_end_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
}

/// Clean a claim into a bounded search query.
///
/// Steps: strip control characters, straighten curly quotes, drop
/// bracketed/parenthesized spans, collapse whitespace, truncate to
/// `max_len` at a word boundary, trim trailing punctuation.
/// Returns an empty string when nothing query-worthy survives.
pub fn clean_query(claim: &str, max_len: usize) -> String {
    let stripped = strip_control_chars(claim);
    let straightened = straighten_quotes(&stripped);
    let unspanned = strip_enclosed_spans(&straightened);
    let collapsed = collapse_whitespace(&unspanned);
    let bounded = truncate_at_word_boundary(&collapsed, max_len);
    trim_trailing_punctuation(bounded).to_string()
}
