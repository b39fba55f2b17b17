//! Text helpers shared by extraction, generation, scoring, and dedup.
//!
//! Normalization here is deliberately crude: lowercase, drop punctuation,
//! collapse whitespace. Token sets built from the normalized form drive
//! the Jaccard similarity used for near-duplicate detection.

use std::collections::BTreeSet;
use std::ops::Range;

// ---------------------------------------------------------------------------
// Normalization & similarity
// ---------------------------------------------------------------------------

/// Lowercase, strip punctuation, collapse runs of whitespace, and trim.
///
/// ```
/// use leadquery::text::normalize;
/// assert_eq!(normalize("  ICT  Students, Kandy! "), "ict students kandy");
/// ```
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The distinct words of the normalized text.
pub fn token_set(text: &str) -> BTreeSet<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// `|A ∩ B| / |A ∪ B|` over two token sets. Two empty sets are identical.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Token-set Jaccard similarity of two raw texts.
pub fn similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

// ---------------------------------------------------------------------------
// Term matching
// ---------------------------------------------------------------------------

/// Case-insensitive substring test, used for "already mentioned" checks.
pub fn contains_ci(text: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && text.to_lowercase().contains(&needle.to_lowercase())
}

/// Locate `term` in `text` on word boundaries.
///
/// Terms shorter than three characters match case-sensitively so that
/// acronyms such as `IT` are not confused with ordinary words; longer
/// terms match ASCII-case-insensitively. Returns the byte range of the
/// first match in `text`.
pub fn find_term(text: &str, term: &str) -> Option<Range<usize>> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let exact = term.chars().count() < 3;
    let (hay, needle) = if exact {
        (text.to_string(), term.to_string())
    } else {
        (text.to_ascii_lowercase(), term.to_ascii_lowercase())
    };

    let mut start = 0;
    while let Some(pos) = hay[start..].find(&needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = hay[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = hay[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return Some(begin..end);
        }
        start = begin + needle.chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Whether `term` occurs in `text` on word boundaries (see [`find_term`]).
pub fn contains_term(text: &str, term: &str) -> bool {
    find_term(text, term).is_some()
}

/// Replace the first word-boundary occurrence of `term` with
/// `replacement`. Returns `None` when the term does not occur.
pub fn replace_term(text: &str, term: &str, replacement: &str) -> Option<String> {
    let range = find_term(text, term)?;
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    Some(collapse_spaces(&out))
}

/// Collapse internal whitespace runs to single spaces and trim.
pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased words of `text` with surrounding punctuation removed.
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
