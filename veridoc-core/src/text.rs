//! Sentence segmentation, tokenization, and n-gram shingling.
//!
//! The sentence scanner splits on terminal punctuation (`.`, `!`, `?`)
//! followed by whitespace, keeping the punctuation attached to the
//! preceding sentence. Implemented as a single character scan.

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut after_terminal = false;

    for ch in text.chars() {
        if after_terminal && ch.is_whitespace() {
            push_trimmed(&mut sentences, &current);
            current.clear();
            after_terminal = false;
            continue;
        }
        current.push(ch);
        after_terminal = matches!(ch, '.' | '!' | '?');
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

fn push_trimmed(out: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Tokenize a sentence into lowercase alphanumeric-and-apostrophe runs.
pub fn tokenize(sentence: &str) -> Vec<String> {
    let lower = sentence.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in lower.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// All contiguous `n`-token shingles, each joined with single spaces.
///
/// Returns an empty vec when the token run is shorter than `n`.
pub fn shingles(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}
