//! Near-duplicate removal.
//!
//! Single pass over a pool that is already sorted best-first. A survivor
//! set is kept whose members are pairwise below the similarity threshold;
//! each incoming candidate either joins it, replaces every survivor it is
//! similar to (when it outranks them all), or is dropped.

use std::collections::BTreeSet;

use crate::text::{jaccard, normalize, token_set};
use crate::types::CandidateQuery;

struct Survivor {
    candidate: CandidateQuery,
    normalized: String,
    tokens: BTreeSet<String>,
}

/// Remove exact and near duplicates from `pool`, preserving order.
///
/// Two candidates are near duplicates when the Jaccard similarity of
/// their token sets is at least `threshold`.
pub fn deduplicate(pool: Vec<CandidateQuery>, threshold: f64) -> Vec<CandidateQuery> {
    let mut survivors: Vec<Survivor> = Vec::with_capacity(pool.len());

    for candidate in pool {
        let normalized = normalize(&candidate.text);
        if normalized.is_empty() || survivors.iter().any(|s| s.normalized == normalized) {
            continue;
        }
        let tokens = token_set(&candidate.text);

        let similar: Vec<usize> = survivors
            .iter()
            .enumerate()
            .filter(|(_, s)| jaccard(&s.tokens, &tokens) >= threshold)
            .map(|(i, _)| i)
            .collect();

        let incoming = Survivor {
            candidate,
            normalized,
            tokens,
        };

        let Some(&first) = similar.first() else {
            survivors.push(incoming);
            continue;
        };

        let best = similar
            .iter()
            .map(|&i| survivors[i].candidate.priority)
            .max()
            .unwrap_or(0);
        if incoming.candidate.priority > best {
            tracing::trace!(
                replaced = similar.len(),
                text = %incoming.candidate.text,
                "near-duplicate replaced"
            );
            survivors[first] = incoming;
            for &i in similar[1..].iter().rev() {
                survivors.remove(i);
            }
        }
    }

    survivors.into_iter().map(|s| s.candidate).collect()
}
