//! Property-based tests for LeadQuery using proptest.
//!
//! These tests verify invariants that must hold for all possible inputs,
//! finding edge cases that unit tests might miss.

use proptest::prelude::*;

use leadquery::config::schema::LearningConfig;
use leadquery::learning::LearningStore;
use leadquery::text::{normalize, similarity};
use leadquery::types::{OptimizeOptions, QueryContext, Source};
use leadquery::QueryOptimizer;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Query-like text built from words the lexicon recognises plus noise.
fn arb_query() -> impl Strategy<Value = String> {
    let word = prop_oneof![
        Just("ICT"),
        Just("students"),
        Just("student"),
        Just("in"),
        Just("near"),
        Just("kandy"),
        Just("Galle"),
        Just("university"),
        Just("shops"),
        Just("business"),
        Just("internships"),
        Just("stuff"),
        Just("find"),
        Just("Computer Science"),
        Just("LLB"),
        Just("cafes"),
    ];
    prop::collection::vec(word, 1..6).prop_map(|words| words.join(" "))
}

fn arb_context() -> impl Strategy<Value = QueryContext> {
    (
        prop::option::of(prop_oneof![Just("kandy"), Just("colombo"), Just("Jaffna")]),
        prop::option::of(prop_oneof![Just("ICT"), Just("Law"), Just("Medicine")]),
        any::<bool>(),
        prop::option::of(Just("SLIIT")),
    )
        .prop_map(|(location, field, student_only, institution)| QueryContext {
            location: location.map(str::to_string),
            field_of_study: field.map(str::to_string),
            student_only,
            institution: institution.map(str::to_string),
            education_level: Vec::new(),
        })
}

fn arb_platforms() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("google_maps".to_string()),
            Just("facebook".to_string()),
            Just("linkedin".to_string()),
            Just("unknown".to_string()),
        ],
        0..3,
    )
}

fn wide_options() -> OptimizeOptions {
    OptimizeOptions {
        max_queries: 500,
        min_quality_score: 0.0,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Returned candidates are pairwise below the dedup threshold.
    #[test]
    fn output_has_no_near_duplicates(
        query in arb_query(),
        ctx in arb_context(),
        platforms in arb_platforms(),
    ) {
        let result = QueryOptimizer::default()
            .optimize(&[query], &ctx, &platforms, &wide_options(), None);
        for (i, a) in result.queries.iter().enumerate() {
            for b in &result.queries[i + 1..] {
                prop_assert!(
                    similarity(a.text(), b.text()) < 0.8,
                    "{:?} vs {:?}", a.text(), b.text()
                );
            }
        }
    }

    /// Quality, priority, and confidence stay in range; the list respects
    /// `max_queries`.
    #[test]
    fn bounds_hold(
        query in arb_query(),
        ctx in arb_context(),
        platforms in arb_platforms(),
        max in 0usize..30,
        learn in any::<bool>(),
    ) {
        let mut store = LearningStore::in_memory(LearningConfig::default());
        if learn {
            store.record("ict students in kandy university", 40, &[]).unwrap();
        }
        let options = OptimizeOptions { max_queries: max, ..Default::default() };
        let result = QueryOptimizer::default()
            .optimize(&[query], &ctx, &platforms, &options, Some(&store));

        prop_assert!(result.queries.len() <= max);
        prop_assert!(result.intent.confidence <= 100);
        for q in &result.queries {
            prop_assert!((0.0..=100.0).contains(&q.quality_score));
            prop_assert!((1..=10).contains(&q.priority()));
            prop_assert!(q.quality_score >= options.min_quality_score);
        }
    }

    /// Identical inputs give identical output.
    #[test]
    fn optimization_is_deterministic(
        query in arb_query(),
        ctx in arb_context(),
        platforms in arb_platforms(),
    ) {
        let optimizer = QueryOptimizer::default();
        let options = OptimizeOptions::default();
        let a = optimizer.optimize(&[query.clone()], &ctx, &platforms, &options, None);
        let b = optimizer.optimize(&[query], &ctx, &platforms, &options, None);
        prop_assert_eq!(a, b);
    }

    /// The trimmed base query comes back as the original at priority 10.
    #[test]
    fn original_is_preserved(
        query in arb_query(),
        ctx in arb_context(),
        platforms in arb_platforms(),
    ) {
        let padded = format!("  {query} ");
        let result = QueryOptimizer::default()
            .optimize(&[padded], &ctx, &platforms, &wide_options(), None);
        let original = result.queries.iter().find(|q| q.text() == query.trim());
        prop_assert!(original.is_some(), "missing original {:?}", query);
        let original = original.unwrap();
        prop_assert_eq!(original.candidate.source, Source::Original);
        prop_assert_eq!(original.priority(), 10);
    }

    /// No two returned candidates share a normalized text.
    #[test]
    fn no_exact_duplicates(query in arb_query(), ctx in arb_context()) {
        let result = QueryOptimizer::default().optimize(&[query], &ctx, &[], &wide_options(), None);
        let mut seen = std::collections::HashSet::new();
        for q in &result.queries {
            prop_assert!(seen.insert(normalize(q.text())));
        }
    }
}
