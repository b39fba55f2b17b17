//! Intent-conditioned phrasings.
//!
//! Each rule derives at most one variant per candidate, one priority step
//! below its parent.

use crate::config::lexicon::Lexicon;
use crate::text::{contains_ci, contains_term};
use crate::types::{CandidateQuery, Intent, IntentType, Source};

use super::{dedup_exact, field_mentioned, mentions_student};

/// Extra candidates for `intent`, deduplicated by normalized text.
/// Job and mixed intents add nothing.
pub fn enhance_for_intent(
    pool: &[CandidateQuery],
    intent: &Intent,
    lexicon: &Lexicon,
) -> Vec<CandidateQuery> {
    let location = intent.entities.location.as_deref().map(str::trim).filter(|l| !l.is_empty());
    let field = intent.entities.field.as_deref().map(str::trim).filter(|f| !f.is_empty());

    let mut out = Vec::new();
    for candidate in pool {
        let text = candidate.text.as_str();
        match intent.intent_type {
            IntentType::StudentSearch => {
                let mut variant = text.to_string();
                if !mentions_student(&variant) {
                    variant.push_str(" students");
                }
                if let Some(loc) = location.filter(|l| !contains_ci(&variant, l)) {
                    variant = format!("{variant} in {loc}");
                }
                if let Some(field) = field.filter(|f| !field_mentioned(&variant, f, lexicon)) {
                    variant = format!("{field} {variant}");
                }
                if variant != text {
                    out.push(candidate.derived(variant, Source::Intent));
                }
            }
            IntentType::BusinessSearch => {
                let mut variant = text.to_string();
                if !contains_term(&variant, "business") && !contains_term(&variant, "businesses") {
                    variant.push_str(" business");
                }
                if let Some(loc) = location.filter(|l| !contains_ci(&variant, l)) {
                    variant = format!("{variant} in {loc}");
                }
                if variant != text {
                    out.push(candidate.derived(variant, Source::Intent));
                }
            }
            IntentType::LocationSearch => {
                if !contains_term(text, "business") {
                    out.push(candidate.derived(format!("{text} business"), Source::Intent));
                }
                if !contains_term(text, "services") {
                    out.push(candidate.derived(format!("{text} services"), Source::Intent));
                }
            }
            IntentType::JobSearch | IntentType::Mixed => {}
        }
    }
    dedup_exact(out)
}
