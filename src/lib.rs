//! LeadQuery: query optimization for lead-generation search.
//!
//! Turns a short free-text intent plus optional context into a ranked,
//! deduplicated list of concrete search strings, and learns from the
//! result counts those strings produce.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod learning;
pub mod observability;
pub mod optimizer;
pub mod rank;
pub mod text;
pub mod types;
pub mod validate;

pub use error::{LeadQueryError, Result};
pub use optimizer::QueryOptimizer;
