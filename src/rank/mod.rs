//! Scoring, deduplication, and ranking of the candidate pool.

pub mod dedup;
pub mod prioritize;
pub mod scoring;

pub use dedup::deduplicate;
pub use prioritize::{combined_score, prioritize};
pub use scoring::{score_isolated, score_query};
