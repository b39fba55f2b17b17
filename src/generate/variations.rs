//! Rules-based expansion of a single base query.
//!
//! Expansion is a fold over [`STRATEGIES`]: each strategy is a pure
//! function of the base text, the context, and the lexicon, and only
//! contributes when its context is present and not already spelled out in
//! the base text. Adding a rule means adding a row to the table.

use std::collections::HashSet;

use crate::config::lexicon::Lexicon;
use crate::text::{collapse_spaces, contains_ci, find_term, replace_term};
use crate::types::{CandidateQuery, QueryContext, Source};

use super::{field_mentioned, mentions_student, present};

/// One expansion rule.
pub type Strategy = fn(&str, &QueryContext, &Lexicon) -> Vec<CandidateQuery>;

/// Registered strategies, applied in order after the original.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("location", location_variants),
    ("field", field_variants),
    ("education", education_variants),
    ("local_context", local_context_variants),
    ("synonym", synonym_variants),
    ("restructure", restructure_variants),
];

const DEFAULT_EDUCATION_LEVEL: &str = "undergraduate";
/// Queries at least this many words long are candidates for moving an
/// embedded location to the end.
const RESTRUCTURE_MIN_WORDS: usize = 4;

/// Expand `base` into candidates. The first element is always the
/// trimmed original (priority 10); blank input yields nothing.
pub fn generate_variations(
    base: &str,
    context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let base = base.trim();
    if base.is_empty() {
        return Vec::new();
    }

    let mut out = vec![CandidateQuery::original(base)];
    for (name, strategy) in STRATEGIES {
        let produced = strategy(base, context, lexicon);
        tracing::trace!(strategy = *name, count = produced.len(), "expansion");
        out.extend(produced);
    }
    out
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// "{q} in {loc}", "{q} {loc}", "{q} near {loc}", "{q} {loc} area".
pub fn location_variants(
    base: &str,
    context: &QueryContext,
    _lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let Some(loc) = present(&context.location) else {
        return Vec::new();
    };
    if contains_ci(base, loc) {
        return Vec::new();
    }
    vec![
        CandidateQuery::new(format!("{base} in {loc}"), 9, Source::Location),
        CandidateQuery::new(format!("{base} {loc}"), 8, Source::Location),
        CandidateQuery::new(format!("{base} near {loc}"), 7, Source::Location),
        CandidateQuery::new(format!("{base} {loc} area"), 6, Source::Location),
    ]
}

/// Canonical field prepended/appended when absent; every other term of
/// the field group substituted for the one the base text uses.
pub fn field_variants(
    base: &str,
    context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let Some(field) = present(&context.field_of_study) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if !field_mentioned(base, field, lexicon) {
        out.push(CandidateQuery::new(format!("{field} {base}"), 9, Source::Field));
        out.push(CandidateQuery::new(format!("{base} {field}"), 8, Source::Field));
    }

    let Some(group) = lexicon.field_group(field) else {
        return out;
    };
    let Some(mentioned) = group.terms().find(|t| find_term(base, t).is_some()) else {
        return out;
    };
    for term in group.terms().filter(|t| *t != mentioned) {
        if let Some(text) = replace_term(base, mentioned, term) {
            out.push(CandidateQuery::new(text, 7, Source::Field));
        }
    }
    out
}

/// Education-level phrasings for student searches, plus institution-type
/// suffixes whenever the base text names students.
pub fn education_variants(
    base: &str,
    context: &QueryContext,
    _lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let mut out = Vec::new();

    if context.student_only {
        let levels: Vec<&str> = if context.education_level.is_empty() {
            vec![DEFAULT_EDUCATION_LEVEL]
        } else {
            context
                .education_level
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect()
        };

        for level in &levels {
            if contains_ci(base, level) {
                continue;
            }
            out.push(CandidateQuery::new(format!("{base} {level}"), 8, Source::Education));
            let substituted = replace_term(base, "students", &format!("{level} students"))
                .or_else(|| replace_term(base, "student", &format!("{level} student")));
            if let Some(text) = substituted {
                out.push(CandidateQuery::new(text, 7, Source::Education));
            }
        }

        let undergraduate = levels
            .iter()
            .any(|l| l.eq_ignore_ascii_case(DEFAULT_EDUCATION_LEVEL));
        if undergraduate && !contains_ci(base, "bachelor") {
            out.push(CandidateQuery::new(
                format!("{base} bachelor degree"),
                6,
                Source::Education,
            ));
        }
    }

    if mentions_student(base) {
        for (suffix, priority) in [("university", 7), ("college", 6)] {
            if !contains_ci(base, suffix) {
                out.push(CandidateQuery::new(
                    format!("{base} {suffix}"),
                    priority,
                    Source::Education,
                ));
            }
        }
    }
    out
}

/// Explicit institution, then gazetteer landmarks for the resolved
/// location.
pub fn local_context_variants(
    base: &str,
    context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let mut out = Vec::new();
    if let Some(institution) = present(&context.institution) {
        if !contains_ci(base, institution) {
            out.push(CandidateQuery::new(
                format!("{base} {institution}"),
                8,
                Source::LocalContext,
            ));
        }
    }
    if let Some(place) = present(&context.location).and_then(|loc| lexicon.place(loc)) {
        for landmark in &place.landmarks {
            if !contains_ci(base, landmark) {
                out.push(CandidateQuery::new(
                    format!("{base} {landmark}"),
                    6,
                    Source::LocalContext,
                ));
            }
        }
    }
    out
}

/// Word-level synonym substitution for any token in the synonym table.
pub fn synonym_variants(
    base: &str,
    _context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for raw in base.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if word.is_empty() || !seen.insert(word.to_lowercase()) {
            continue;
        }
        let Some(synonyms) = lexicon.word_synonyms(word) else {
            continue;
        };
        for synonym in synonyms {
            if let Some(text) = replace_term(base, word, synonym) {
                out.push(CandidateQuery::new(text, 5, Source::Synonym));
            }
        }
    }
    out
}

/// Move a location buried mid-sentence to the end; prefix "looking for"
/// to student searches.
pub fn restructure_variants(
    base: &str,
    context: &QueryContext,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let mut out = Vec::new();

    if let Some(loc) = present(&context.location) {
        if let Some(text) = move_location_to_end(base, loc, lexicon) {
            out.push(CandidateQuery::new(text, 5, Source::Synonym));
        }
    }

    if mentions_student(base) && !base.to_lowercase().starts_with("looking for") {
        out.push(CandidateQuery::new(
            format!("looking for {base}"),
            4,
            Source::Synonym,
        ));
    }
    out
}

fn move_location_to_end(base: &str, loc: &str, lexicon: &Lexicon) -> Option<String> {
    if base.split_whitespace().count() < RESTRUCTURE_MIN_WORDS {
        return None;
    }
    let range = find_term(base, loc)?;
    let tail = base[range.end..].trim();
    if tail.is_empty() || tail.chars().all(|c| !c.is_alphanumeric()) {
        return None;
    }

    // Take the preposition with the place when there is one.
    let head = base[..range.start].trim_end();
    let start = match head.rsplit_once(char::is_whitespace) {
        Some((_, last)) if is_preposition(last, lexicon) => head.len() - last.len(),
        None if is_preposition(head, lexicon) => 0,
        _ => range.start,
    };
    let remainder = collapse_spaces(&format!("{} {}", &base[..start], tail));
    if remainder.is_empty() {
        return None;
    }
    Some(format!("{remainder} in {loc}"))
}

fn is_preposition(word: &str, lexicon: &Lexicon) -> bool {
    lexicon
        .location_prepositions
        .iter()
        .any(|p| p.eq_ignore_ascii_case(word))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
