//! Context extraction: infer structured hints from free text.
//!
//! Every extractor is total. No match simply leaves the field unset.

use crate::config::lexicon::{mentions_any, Lexicon};
use crate::types::QueryContext;

/// Location named in `text`.
///
/// A prepositional phrase ("in X", "near X") wins over a bare gazetteer
/// mention. Prepositional matches keep the user's spelling; gazetteer
/// matches return the gazetteer name.
pub fn extract_location(text: &str, lexicon: &Lexicon) -> Option<String> {
    lexicon
        .prepositional_location(text)
        .map(str::to_string)
        .or_else(|| lexicon.find_place(text).map(|p| p.name.clone()))
}

/// Canonical field of study mentioned in `text` (never the synonym that
/// matched).
pub fn extract_field(text: &str, lexicon: &Lexicon) -> Option<String> {
    lexicon
        .find_field(text)
        .map(|(group, _)| group.canonical.clone())
}

/// Whether `text` signals a student-only search.
pub fn has_student_signal(text: &str, lexicon: &Lexicon) -> bool {
    mentions_any(text, &lexicon.student_keywords)
}

/// Best-effort context from raw text alone.
pub fn extract_context(text: &str, lexicon: &Lexicon) -> QueryContext {
    QueryContext {
        location: extract_location(text, lexicon),
        field_of_study: extract_field(text, lexicon),
        student_only: has_student_signal(text, lexicon),
        institution: None,
        education_level: Vec::new(),
    }
}

/// Complete `context` from the base queries: each absent field is filled
/// from the first query that yields it.
pub fn infer_context(
    base_queries: &[String],
    context: &QueryContext,
    lexicon: &Lexicon,
) -> QueryContext {
    let mut filled = context.clone();
    for query in base_queries.iter().filter(|q| !q.trim().is_empty()) {
        filled.fill_gaps(&extract_context(query, lexicon));
    }
    filled
}
