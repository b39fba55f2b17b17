//! The end-to-end optimization pipeline.
//!
//! Stages, in order: infer context, generate variations, classify intent,
//! enhance for intent, expand per platform, deduplicate, prioritize,
//! apply learned boosts, filter by quality, truncate.

use crate::config::lexicon::Lexicon;
use crate::config::schema::OptimizerConfig;
use crate::extract::{detect_intent, extract_context, infer_context};
use crate::generate::{
    enhance_for_intent, generate_variations, merge_pool, optimize_for_platforms,
};
use crate::learning::{boost, LearningStore};
use crate::rank::{combined_score, deduplicate, prioritize, score_isolated};
use crate::types::{
    Analytics, Intent, OptimizationResult, OptimizeOptions, QualityBreakdown, QueryContext,
    ScoredCandidate, Source, Validation,
};
use crate::validate::validate_query;

/// Holds the configuration and lexicon every stage reads. Cheap to share;
/// all methods take `&self`.
#[derive(Debug, Clone, Default)]
pub struct QueryOptimizer {
    config: OptimizerConfig,
    lexicon: Lexicon,
}

impl QueryOptimizer {
    pub fn new(config: OptimizerConfig, lexicon: Lexicon) -> Self {
        Self { config, lexicon }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Per-call options seeded from the configured defaults.
    pub fn default_options(&self) -> OptimizeOptions {
        self.config.options.clone()
    }

    pub fn extract_context(&self, text: &str) -> QueryContext {
        extract_context(text, &self.lexicon)
    }

    pub fn detect_intent(&self, text: &str, context: &QueryContext) -> Intent {
        detect_intent(text, context, &self.lexicon)
    }

    pub fn validate(&self, text: &str, context: &QueryContext) -> Validation {
        validate_query(text, context, &self.lexicon, &self.config.scoring)
    }

    /// Quality of one query outside any pool.
    pub fn score(
        &self,
        text: &str,
        context: &QueryContext,
        platforms: &[String],
    ) -> QualityBreakdown {
        score_isolated(text, context, platforms, &self.lexicon, &self.config.scoring)
    }

    /// Turn `base_queries` into a ranked, deduplicated list of at most
    /// `options.max_queries` search strings.
    ///
    /// `learning` is only read; passing `None` (or disabling learning in
    /// `options`) skips the boost stage.
    pub fn optimize(
        &self,
        base_queries: &[String],
        context: &QueryContext,
        platforms: &[String],
        options: &OptimizeOptions,
        learning: Option<&LearningStore>,
    ) -> OptimizationResult {
        let lexicon = &self.lexicon;
        let scoring = &self.config.scoring;
        let bases: Vec<&str> = base_queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .collect();

        let filled = infer_context(base_queries, context, lexicon);

        // 1. variations
        let mut pool = merge_pool(
            bases
                .iter()
                .flat_map(|base| generate_variations(base, &filled, lexicon))
                .collect(),
        );
        tracing::debug!("Generated {} variations from {} base queries", pool.len(), bases.len());

        // 2. intent, against the caller's own context
        let intent = detect_intent(bases.first().copied().unwrap_or(""), context, lexicon);
        tracing::debug!("Intent {} ({}%)", intent.intent_type, intent.confidence);

        // 3. intent enhancement
        let enhanced = enhance_for_intent(&pool, &intent, lexicon);
        tracing::debug!("Intent enhancer added {} candidates", enhanced.len());
        pool.extend(enhanced);
        pool = merge_pool(pool);

        // 4. platform expansion
        if options.enable_platform_optimization && !platforms.is_empty() {
            let expanded = optimize_for_platforms(&pool, platforms, &filled, lexicon);
            tracing::debug!("Platform optimizer added {} candidates", expanded.len());
            pool.extend(expanded);
            pool = merge_pool(pool);
        }
        let generated = pool.len();

        // 5. dedup + prioritize
        let deduped = deduplicate(pool, scoring.similarity_threshold);
        let after_dedup = deduped.len();
        tracing::debug!("Deduplicated {generated} -> {after_dedup}");
        let mut ranked = prioritize(deduped, &filled, platforms, lexicon, scoring);

        // 6. learning boost
        let mut learning_applied = false;
        if options.enable_learning {
            if let Some(store) = learning {
                let patterns = store.derive_patterns(lexicon);
                if !patterns.is_empty() {
                    ranked = boost(&ranked, &patterns, lexicon, store.config());
                    for scored in &mut ranked {
                        scored.combined_score =
                            combined_score(scored.quality_score, scored.priority(), scoring);
                    }
                    learning_applied = true;
                    tracing::debug!(
                        "Applied {} learned keywords and {} structures",
                        patterns.top_keywords.len(),
                        patterns.structures.len()
                    );
                }
            }
        }

        // 7. quality filter, 8. truncate
        ranked.retain(|s| s.quality_score >= options.min_quality_score);
        let after_quality_filter = ranked.len();
        let ranked = truncate_keeping_originals(ranked, options.max_queries);

        let average_quality = if ranked.is_empty() {
            0.0
        } else {
            ranked.iter().map(|s| s.quality_score).sum::<f64>() / ranked.len() as f64
        };
        tracing::debug!(
            "Returning {} of {after_quality_filter} candidates above quality {}",
            ranked.len(),
            options.min_quality_score
        );

        OptimizationResult {
            analytics: Analytics {
                generated,
                after_dedup,
                after_quality_filter,
                returned: ranked.len(),
                average_quality,
                learning_applied,
            },
            queries: ranked,
            intent,
        }
    }
}

/// Keep the first `max` entries in rank order, except that surviving
/// originals always get a slot ahead of lower-ranked variants.
fn truncate_keeping_originals(ranked: Vec<ScoredCandidate>, max: usize) -> Vec<ScoredCandidate> {
    if ranked.len() <= max {
        return ranked;
    }
    let is_original = |s: &ScoredCandidate| s.candidate.source == Source::Original;
    let mut originals = ranked.iter().filter(|s| is_original(s)).count().min(max);
    let mut others = max - originals;
    ranked
        .into_iter()
        .filter(|s| {
            let slots = if is_original(s) { &mut originals } else { &mut others };
            if *slots == 0 {
                return false;
            }
            *slots -= 1;
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LearningConfig;
    use crate::types::{CandidateQuery, IntentType};
    use pretty_assertions::assert_eq;

    fn optimizer() -> QueryOptimizer {
        QueryOptimizer::default()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn original_comes_back_first() {
        let opt = optimizer();
        let options = OptimizeOptions {
            max_queries: 100,
            ..Default::default()
        };
        let result = opt.optimize(
            &strings(&["ICT students"]),
            &QueryContext::default(),
            &[],
            &options,
            None,
        );
        assert_eq!(result.intent.intent_type, IntentType::StudentSearch);
        assert!(result.queries.iter().any(|q| q.text() == "ICT students" && q.priority() == 10));
        assert!(result.queries.iter().all(|q| q.text() != "ICT undergraduate students"));
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = optimizer().optimize(
            &strings(&["", "   "]),
            &QueryContext::default(),
            &[],
            &OptimizeOptions::default(),
            None,
        );
        assert!(result.queries.is_empty());
        assert_eq!(result.intent.intent_type, IntentType::Mixed);
        assert_eq!(result.analytics.generated, 0);
        assert_eq!(result.analytics.average_quality, 0.0);
    }

    #[test]
    fn max_queries_respected() {
        let options = OptimizeOptions {
            max_queries: 3,
            ..Default::default()
        };
        let result = optimizer().optimize(
            &strings(&["students"]),
            &QueryContext::default().with_location("kandy"),
            &strings(&["facebook", "google_maps"]),
            &options,
            None,
        );
        assert_eq!(result.queries.len(), 3);
        assert_eq!(result.analytics.returned, 3);
        assert!(result.analytics.after_quality_filter >= 3);
    }

    #[test]
    fn platform_optimization_can_be_disabled() {
        let opt = optimizer();
        let platforms = strings(&["facebook"]);
        let base = strings(&["ICT students"]);
        let on = opt.optimize(
            &base,
            &QueryContext::default(),
            &platforms,
            &OptimizeOptions::default(),
            None,
        );
        let off_opts = OptimizeOptions {
            enable_platform_optimization: false,
            max_queries: 500,
            ..Default::default()
        };
        let off = opt.optimize(&base, &QueryContext::default(), &platforms, &off_opts, None);
        assert!(on.analytics.generated > off.analytics.generated);
        assert!(off.queries.iter().all(|q| q.candidate.source != Source::Platform));
    }

    #[test]
    fn learning_disabled_skips_boost() {
        let mut store = LearningStore::in_memory(LearningConfig::default());
        store.record("ict students in kandy", 25, &[]).unwrap();
        let options = OptimizeOptions {
            enable_learning: false,
            ..Default::default()
        };
        let result = optimizer().optimize(
            &strings(&["ict students"]),
            &QueryContext::default().with_location("kandy"),
            &[],
            &options,
            Some(&store),
        );
        assert!(!result.analytics.learning_applied);
    }

    #[test]
    fn analytics_average_matches_queries() {
        let result = optimizer().optimize(
            &strings(&["bakeries in galle"]),
            &QueryContext::default(),
            &[],
            &OptimizeOptions::default(),
            None,
        );
        let mean = result.queries.iter().map(|q| q.quality_score).sum::<f64>()
            / result.queries.len() as f64;
        assert!((result.analytics.average_quality - mean).abs() < 1e-9);
        assert!(result.analytics.after_dedup <= result.analytics.generated);
    }

    fn scored(text: &str, source: Source) -> ScoredCandidate {
        ScoredCandidate {
            candidate: CandidateQuery::new(text, 5, source),
            quality_score: 60.0,
            uniqueness: 50.0,
            combined_score: 40.0,
        }
    }

    #[test]
    fn truncation_reserves_slots_for_originals() {
        let ranked = vec![
            scored("a", Source::Field),
            scored("b", Source::Location),
            scored("c", Source::Synonym),
            scored("orig", Source::Original),
        ];
        let kept = truncate_keeping_originals(ranked, 2);
        let texts: Vec<&str> = kept.iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["a", "orig"]);
    }

    #[test]
    fn truncation_to_zero_is_empty() {
        let kept = truncate_keeping_originals(vec![scored("orig", Source::Original)], 0);
        assert!(kept.is_empty());
    }
}
