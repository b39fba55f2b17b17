//! Candidate generation.
//!
//! - [`variations`]: per-base-query expansion strategies
//! - [`intent`]: extra phrasings conditioned on the classified intent
//! - [`platform`]: per-platform phrasings
//!
//! Every stage hands its output to [`merge_pool`], which drops exact
//! (normalized) repeats and orders the pool by priority, then source.

pub mod intent;
pub mod platform;
pub mod variations;

use std::collections::HashSet;

use crate::config::lexicon::Lexicon;
use crate::text::{contains_ci, contains_term, normalize};
use crate::types::CandidateQuery;

pub use intent::enhance_for_intent;
pub use platform::optimize_for_platforms;
pub use variations::{generate_variations, Strategy, STRATEGIES};

/// Sort by priority (descending), breaking ties by source rank, then keep
/// the first candidate for each normalized text. Empty texts are dropped.
pub fn merge_pool(mut pool: Vec<CandidateQuery>) -> Vec<CandidateQuery> {
    pool.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.source.tie_rank().cmp(&b.source.tie_rank()))
    });
    let mut seen = HashSet::new();
    pool.into_iter()
        .filter(|c| {
            let key = normalize(&c.text);
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Drop repeated normalized texts, keeping the first occurrence.
pub(crate) fn dedup_exact(candidates: Vec<CandidateQuery>) -> Vec<CandidateQuery> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(normalize(&c.text)))
        .collect()
}

/// Whether `text` already names `field`, directly or through any synonym
/// of its group.
pub(crate) fn field_mentioned(text: &str, field: &str, lexicon: &Lexicon) -> bool {
    if contains_ci(text, field) {
        return true;
    }
    lexicon
        .field_group(field)
        .is_some_and(|group| group.terms().any(|t| contains_term(text, t)))
}

/// Whether `text` mentions a student, singular or plural.
pub(crate) fn mentions_student(text: &str) -> bool {
    contains_term(text, "student") || contains_term(text, "students")
}

/// A non-empty trimmed context value.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
