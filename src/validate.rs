//! Single-query validation with actionable suggestions.

use crate::config::lexicon::Lexicon;
use crate::config::schema::ScoringConfig;
use crate::extract::context::extract_location;
use crate::generate::present;
use crate::rank::scoring::score_isolated;
use crate::text::words;
use crate::types::{EstimatedResults, QueryContext, Validation};

const MIN_LENGTH: usize = 5;
const MAX_LENGTH: usize = 100;
const HIGH_QUALITY: f64 = 70.0;
const LOW_QUALITY: f64 = 50.0;

pub const ISSUE_TOO_SHORT: &str = "too short";
pub const ISSUE_TOO_LONG: &str = "too long";
pub const ISSUE_NO_LOCATION: &str = "no location specified";
pub const ISSUE_VAGUE: &str = "contains vague terms";

/// Check `text` against every rule; all rules run and their issues
/// accumulate.
///
/// `estimated_results` is scored with `context` but no platforms, so a
/// caller-supplied location counts toward it.
pub fn validate_query(
    text: &str,
    context: &QueryContext,
    lexicon: &Lexicon,
    scoring: &ScoringConfig,
) -> Validation {
    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    let len = text.trim().chars().count();

    if len < MIN_LENGTH {
        issues.push(ISSUE_TOO_SHORT.to_string());
        suggestions.push("add more context".to_string());
    }
    if len > MAX_LENGTH {
        issues.push(ISSUE_TOO_LONG.to_string());
        suggestions.push("simplify".to_string());
    }
    if present(&context.location).is_none() && extract_location(text, lexicon).is_none() {
        issues.push(ISSUE_NO_LOCATION.to_string());
        suggestions.push("add a location, e.g. \"in Kandy\"".to_string());
    }
    let vague: Vec<String> = words(text)
        .into_iter()
        .filter(|w| lexicon.vague_words.iter().any(|v| v.eq_ignore_ascii_case(w)))
        .collect();
    if !vague.is_empty() {
        issues.push(ISSUE_VAGUE.to_string());
        suggestions.push(format!(
            "be specific instead of using {}",
            vague.join(", ")
        ));
    }

    let quality = score_isolated(text, context, &[], lexicon, scoring).score;
    let estimated_results = if quality >= HIGH_QUALITY {
        EstimatedResults::High
    } else if quality < LOW_QUALITY {
        EstimatedResults::Low
    } else {
        EstimatedResults::Medium
    };

    Validation {
        is_valid: issues.is_empty(),
        issues,
        suggestions,
        estimated_results,
    }
}
