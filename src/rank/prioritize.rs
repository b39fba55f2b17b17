//! Final ranking: pool-relative uniqueness, blended quality, and the
//! combined quality/priority score.

use std::collections::BTreeSet;

use crate::config::lexicon::Lexicon;
use crate::config::schema::ScoringConfig;
use crate::text::{jaccard, token_set};
use crate::types::{CandidateQuery, QueryContext, ScoredCandidate};

use super::scoring::score_query;

/// `round((1 - mean similarity to the rest of the pool) * 100)` per
/// candidate; a lone candidate gets `isolated`.
pub fn pool_uniqueness(pool: &[CandidateQuery], isolated: f64) -> Vec<f64> {
    if pool.len() < 2 {
        return vec![isolated; pool.len()];
    }
    let sets: Vec<BTreeSet<String>> = pool.iter().map(|c| token_set(&c.text)).collect();
    let others = (sets.len() - 1) as f64;
    sets.iter()
        .enumerate()
        .map(|(i, a)| {
            let total: f64 = sets
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| jaccard(a, b))
                .sum();
            ((1.0 - total / others) * 100.0).round()
        })
        .collect()
}

/// `quality * (1 - priority_weight) + priority * priority_weight`.
pub fn combined_score(quality: f64, priority: u8, config: &ScoringConfig) -> f64 {
    quality * (1.0 - config.priority_weight) + f64::from(priority) * config.priority_weight
}

/// Score every candidate against the pool and sort best-first (stable).
pub fn prioritize(
    pool: Vec<CandidateQuery>,
    context: &QueryContext,
    platforms: &[String],
    lexicon: &Lexicon,
    config: &ScoringConfig,
) -> Vec<ScoredCandidate> {
    let uniqueness = pool_uniqueness(&pool, config.isolated_uniqueness);

    let mut scored: Vec<ScoredCandidate> = pool
        .into_iter()
        .zip(uniqueness)
        .map(|(candidate, uniqueness)| {
            let quality = score_query(
                &candidate.text,
                context,
                platforms,
                uniqueness,
                lexicon,
                &config.weights,
            )
            .score;
            let blended = (quality * (1.0 - config.uniqueness_blend)
                + uniqueness * config.uniqueness_blend)
                .clamp(0.0, 100.0);
            let combined = combined_score(blended, candidate.priority, config);
            ScoredCandidate {
                candidate,
                quality_score: blended,
                uniqueness,
                combined_score: combined,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    scored
}
