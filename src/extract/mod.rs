//! Heuristic extraction from raw query text.
//!
//! - [`context`]: location, field of study, and student signal
//! - [`intent`]: intent type, entities, and confidence

pub mod context;
pub mod intent;

pub use context::{extract_context, infer_context};
pub use intent::detect_intent;
