//! Quality scoring of a single query text.
//!
//! Five heuristic sub-factors, each in `[0, 100]`, combined with the
//! configured weights. Scoring is a pure function of the text, the
//! context, the target platforms, and a uniqueness value supplied by the
//! caller (pool-relative, or the isolated default).

use crate::config::lexicon::{mentions_any, Lexicon, PlatformKind};
use crate::config::schema::{ScoreWeights, ScoringConfig};
use crate::extract::context::extract_location;
use crate::generate::present;
use crate::text::words;
use crate::types::{QualityBreakdown, QueryContext};

const BASE_SPECIFICITY: f64 = 50.0;
const BASE_CLARITY: f64 = 70.0;
const BASE_PLATFORM_FIT: f64 = 50.0;

/// 100 for 10–50 characters, 80 for 5–70, 30 under 5, else 50.
pub fn length_score(text: &str) -> f64 {
    let len = text.trim().chars().count();
    match len {
        10..=50 => 100.0,
        5..=70 => 80.0,
        0..=4 => 30.0,
        _ => 50.0,
    }
}

/// Location, field, student/education, and institution signals on top of
/// a base of 50.
pub fn specificity_score(text: &str, context: &QueryContext, lexicon: &Lexicon) -> f64 {
    let mut score = BASE_SPECIFICITY;
    if present(&context.location).is_some() || extract_location(text, lexicon).is_some() {
        score += 20.0;
    }
    if present(&context.field_of_study).is_some() || lexicon.find_field(text).is_some() {
        score += 15.0;
    }
    if context.student_only || mentions_any(text, &lexicon.education_keywords) {
        score += 10.0;
    }
    if mentions_any(text, &lexicon.institution_keywords) {
        score += 5.0;
    }
    score.min(100.0)
}

/// −10 per vague word, +10 for an action phrase, +10 for three or more
/// words.
pub fn clarity_score(text: &str, lexicon: &Lexicon) -> f64 {
    let tokens = words(text);
    let vague = tokens
        .iter()
        .filter(|t| lexicon.vague_words.iter().any(|v| v.eq_ignore_ascii_case(t)))
        .count();

    let mut score = BASE_CLARITY - 10.0 * vague as f64;
    if mentions_any(text, &lexicon.action_phrases) {
        score += 10.0;
    }
    if tokens.len() >= 3 {
        score += 10.0;
    }
    score.clamp(0.0, 100.0)
}

/// How well the phrasing suits the targeted platform kinds.
pub fn platform_fit_score(text: &str, platforms: &[String], lexicon: &Lexicon) -> f64 {
    let mut score = BASE_PLATFORM_FIT;
    if platforms.is_empty() {
        return score;
    }
    if lexicon.targets(platforms, PlatformKind::Map) && extract_location(text, lexicon).is_some() {
        score += 20.0;
    }
    if lexicon.targets(platforms, PlatformKind::Social)
        && mentions_any(text, &lexicon.individual_terms)
    {
        score += 20.0;
    }
    if lexicon.targets(platforms, PlatformKind::Professional)
        && mentions_any(text, &lexicon.professional_terms)
    {
        score += 15.0;
    }
    score.min(100.0)
}

/// Score `text` with an explicit uniqueness value.
pub fn score_query(
    text: &str,
    context: &QueryContext,
    platforms: &[String],
    uniqueness: f64,
    lexicon: &Lexicon,
    weights: &ScoreWeights,
) -> QualityBreakdown {
    let length = length_score(text);
    let specificity = specificity_score(text, context, lexicon);
    let clarity = clarity_score(text, lexicon);
    let platform_fit = platform_fit_score(text, platforms, lexicon);
    let uniqueness = uniqueness.clamp(0.0, 100.0);

    let composite = length * weights.length
        + specificity * weights.specificity
        + clarity * weights.clarity
        + platform_fit * weights.platform_fit
        + uniqueness * weights.uniqueness;

    QualityBreakdown {
        length,
        specificity,
        clarity,
        platform_fit,
        uniqueness,
        score: composite.round().clamp(0.0, 100.0),
    }
}

/// Score `text` outside any pool, using the configured isolated
/// uniqueness.
pub fn score_isolated(
    text: &str,
    context: &QueryContext,
    platforms: &[String],
    lexicon: &Lexicon,
    config: &ScoringConfig,
) -> QualityBreakdown {
    score_query(
        text,
        context,
        platforms,
        config.isolated_uniqueness,
        lexicon,
        &config.weights,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn lex() -> Lexicon {
        Lexicon::default()
    }

    fn platforms(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test_case("IT", 30.0 ; "under five")]
    #[test_case("stuff", 80.0 ; "five chars")]
    #[test_case("ICT students", 100.0 ; "sweet spot")]
    #[test_case(&"x".repeat(60), 80.0 ; "up to seventy")]
    #[test_case(&"x".repeat(90), 50.0 ; "too long")]
    fn length_cases(text: &str, expected: f64) {
        assert_eq!(length_score(text), expected);
    }

    #[test]
    fn specificity_accumulates_signals() {
        let lex = lex();
        assert_eq!(specificity_score("stuff", &QueryContext::default(), &lex), 50.0);
        // inline location + field + student + institution
        assert_eq!(
            specificity_score("ICT students university in kandy", &QueryContext::default(), &lex),
            100.0
        );
        let ctx = QueryContext::default().with_location("galle").student_only(true);
        assert_eq!(specificity_score("cafes", &ctx, &lex), 80.0);
    }

    #[test_case("stuff", 60.0 ; "one vague word")]
    #[test_case("related things stuff etc", 40.0 ; "many vague words plus length bonus")]
    #[test_case("find ICT students", 90.0 ; "action and three words")]
    #[test_case("looking for students", 90.0 ; "multi word action")]
    #[test_case("ICT students", 70.0 ; "plain")]
    fn clarity_cases(text: &str, expected: f64) {
        assert_eq!(clarity_score(text, &lex()), expected);
    }

    #[test]
    fn clarity_never_negative() {
        let text = "stuff ".repeat(12);
        assert_eq!(clarity_score(&text, &lex()), 0.0);
    }

    #[test]
    fn platform_fit_by_kind() {
        let lex = lex();
        assert_eq!(platform_fit_score("students in kandy", &[], &lex), 50.0);
        assert_eq!(
            platform_fit_score("students in kandy", &platforms(&["google_maps"]), &lex),
            70.0
        );
        assert_eq!(
            platform_fit_score(
                "students in kandy",
                &platforms(&["google_maps", "facebook"]),
                &lex
            ),
            90.0
        );
        assert_eq!(
            platform_fit_score(
                "graduate students in kandy",
                &platforms(&["google_maps", "facebook", "linkedin"]),
                &lex
            ),
            100.0
        );
    }

    #[test]
    fn composite_uses_weights_and_rounds() {
        let config = ScoringConfig::default();
        let q = score_isolated("stuff", &QueryContext::default(), &[], &lex(), &config);
        // 80*.15 + 50*.30 + 60*.25 + 50*.20 + 50*.10 = 57
        assert_eq!(q.score, 57.0);
        assert_eq!(q.uniqueness, 50.0);
    }

    proptest! {
        #[test]
        fn quality_always_bounded(text in "\\PC{0,120}", uniq in -50.0f64..150.0) {
            let q = score_query(
                &text,
                &QueryContext::default().with_location("kandy"),
                &platforms(&["facebook", "google_maps", "linkedin"]),
                uniq,
                &Lexicon::default(),
                &ScoreWeights::default(),
            );
            for v in [q.length, q.specificity, q.clarity, q.platform_fit, q.uniqueness, q.score] {
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }
    }
}
