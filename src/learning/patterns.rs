//! Pattern mining over successful history, and the priority boost it
//! drives.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::config::lexicon::Lexicon;
use crate::config::schema::LearningConfig;
use crate::extract::context::extract_location;
use crate::text::{contains_ci, contains_term, token_set};
use crate::types::{clamp_priority, HistoricalRecord, ScoredCandidate};

/// Query shapes that recur among successful searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralTag {
    LocationBased,
    StudentFocused,
    EducationFocused,
}

impl StructuralTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocationBased => "location-based",
            Self::StudentFocused => "student-focused",
            Self::EducationFocused => "education-focused",
        }
    }
}

impl std::fmt::Display for StructuralTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags that describe `text`.
pub fn structural_tags(text: &str, lexicon: &Lexicon) -> BTreeSet<StructuralTag> {
    let mut tags = BTreeSet::new();
    if extract_location(text, lexicon).is_some() {
        tags.insert(StructuralTag::LocationBased);
    }
    if contains_ci(text, "student") {
        tags.insert(StructuralTag::StudentFocused);
    }
    if contains_term(text, "university") || contains_term(text, "college") {
        tags.insert(StructuralTag::EducationFocused);
    }
    tags
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedPatterns {
    /// `(keyword, cumulative results)`, heaviest first.
    pub top_keywords: Vec<(String, u64)>,
    pub structures: BTreeSet<StructuralTag>,
}

impl LearnedPatterns {
    pub fn is_empty(&self) -> bool {
        self.top_keywords.is_empty() && self.structures.is_empty()
    }
}

/// Mine keywords and structural tags from records whose result count
/// exceeds `config.min_results`.
pub fn derive_patterns(
    records: &[HistoricalRecord],
    lexicon: &Lexicon,
    config: &LearningConfig,
) -> LearnedPatterns {
    let mut weights: HashMap<String, u64> = HashMap::new();
    let mut structures = BTreeSet::new();

    for record in records.iter().filter(|r| r.results_count > config.min_results) {
        for token in token_set(&record.query_text) {
            if token.chars().count() >= config.min_keyword_len {
                *weights.entry(token).or_default() += record.results_count;
            }
        }
        structures.extend(structural_tags(&record.query_text, lexicon));
    }

    let mut top_keywords: Vec<(String, u64)> = weights.into_iter().collect();
    top_keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_keywords.truncate(config.top_keywords);

    LearnedPatterns {
        top_keywords,
        structures,
    }
}

/// Raise the priority of candidates that match learned patterns, then
/// re-sort by priority (stable). Scores other than priority are left as
/// they were.
pub fn boost(
    candidates: &[ScoredCandidate],
    patterns: &LearnedPatterns,
    lexicon: &Lexicon,
    config: &LearningConfig,
) -> Vec<ScoredCandidate> {
    let mut boosted: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|scored| {
            let text = scored.text();
            let keywords = patterns
                .top_keywords
                .iter()
                .filter(|(kw, _)| contains_term(text, kw))
                .count() as i32;
            let tags = structural_tags(text, lexicon)
                .intersection(&patterns.structures)
                .count() as i32;
            let bonus = keywords * i32::from(config.keyword_boost)
                + tags * i32::from(config.pattern_boost);

            let mut out = scored.clone();
            if bonus > 0 {
                out.candidate.priority = clamp_priority(i32::from(scored.priority()) + bonus);
            }
            out
        })
        .collect();

    boosted.sort_by(|a, b| b.priority().cmp(&a.priority()));
    boosted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CandidateQuery, Source};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn record(text: &str, results: u64) -> HistoricalRecord {
        let ts = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        HistoricalRecord::new(text, results, vec![], ts)
    }

    fn scored(text: &str, priority: u8) -> ScoredCandidate {
        ScoredCandidate {
            candidate: CandidateQuery::new(text, priority, Source::Location),
            quality_score: 70.0,
            uniqueness: 50.0,
            combined_score: 70.0,
        }
    }

    #[test]
    fn tags_for_text() {
        let lex = Lexicon::default();
        let tags = structural_tags("ict students in kandy university", &lex);
        assert_eq!(
            tags.into_iter().collect::<Vec<_>>(),
            vec![
                StructuralTag::LocationBased,
                StructuralTag::StudentFocused,
                StructuralTag::EducationFocused
            ]
        );
        assert!(structural_tags("bakeries", &lex).is_empty());
    }

    #[test]
    fn only_successful_records_count() {
        let patterns = derive_patterns(
            &[record("ict students in kandy", 25), record("bakeries galle", 5)],
            &Lexicon::default(),
            &LearningConfig::default(),
        );
        assert_eq!(
            patterns.top_keywords,
            vec![("kandy".to_string(), 25), ("students".to_string(), 25)]
        );
        assert!(patterns.structures.contains(&StructuralTag::LocationBased));
        assert!(patterns.structures.contains(&StructuralTag::StudentFocused));
        assert!(!patterns.structures.contains(&StructuralTag::EducationFocused));
    }

    #[test]
    fn keyword_weights_accumulate_across_records() {
        let patterns = derive_patterns(
            &[
                record("students kandy", 10),
                record("students galle", 20),
                record("students students colombo", 7),
            ],
            &Lexicon::default(),
            &LearningConfig::default(),
        );
        assert_eq!(patterns.top_keywords[0], ("students".to_string(), 37));
        assert_eq!(patterns.top_keywords[1], ("galle".to_string(), 20));
    }

    #[test]
    fn top_keywords_truncated() {
        let config = LearningConfig {
            top_keywords: 2,
            ..Default::default()
        };
        let patterns = derive_patterns(
            &[record("alpha bravo charlie delta", 50)],
            &Lexicon::default(),
            &config,
        );
        assert_eq!(patterns.top_keywords.len(), 2);
        // equal weights fall back to alphabetical order
        assert_eq!(patterns.top_keywords[0].0, "alpha");
    }

    #[test]
    fn boost_raises_matching_candidates_and_resorts() {
        let lex = Lexicon::default();
        let patterns = derive_patterns(
            &[record("ict students in kandy", 25)],
            &lex,
            &LearningConfig::default(),
        );
        let out = boost(
            &[scored("cafes", 8), scored("ict students in kandy", 6)],
            &patterns,
            &lex,
            &LearningConfig::default(),
        );
        // two keywords (+4) and two tags (+6), capped at 10
        assert_eq!(out[0].text(), "ict students in kandy");
        assert_eq!(out[0].priority(), 10);
        assert_eq!(out[1].priority(), 8);
    }

    #[test]
    fn boost_with_no_patterns_is_identity() {
        let input = vec![scored("a", 5), scored("b", 7)];
        let out = boost(
            &input,
            &LearnedPatterns::default(),
            &Lexicon::default(),
            &LearningConfig::default(),
        );
        assert_eq!(out[0].text(), "b");
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], input[0]);
    }

    proptest! {
        #[test]
        fn boosted_priority_in_range(p in 1u8..=10, text in "[a-z ]{0,30}") {
            let lex = Lexicon::default();
            let patterns = derive_patterns(
                &[record("students in kandy university", 100)],
                &lex,
                &LearningConfig::default(),
            );
            let pool = [scored(&format!("x{text}"), p)];
            let out = boost(&pool, &patterns, &lex, &LearningConfig::default());
            prop_assert!(out[0].priority() >= p);
            prop_assert!(out[0].priority() <= 10);
        }
    }
}
