//! Command-line front end.
//!
//! Argument definitions live here; [`output`] renders results either as
//! styled text or as JSON.

pub mod output;

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::{load_config, load_lexicon};
use crate::error::{LeadQueryError, Result};
use crate::learning::LearningStore;
use crate::optimizer::QueryOptimizer;
use crate::types::QueryContext;

/// LeadQuery: expand and rank search queries for lead generation
#[derive(Parser, Debug)]
#[command(name = "leadquery")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Structured hints shared by several subcommands.
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct ContextArgs {
    /// Target location, e.g. "kandy"
    #[arg(short, long)]
    pub location: Option<String>,
    /// Field of study, e.g. "ICT"
    #[arg(short, long)]
    pub field: Option<String>,
    /// Restrict to student searches
    #[arg(long)]
    pub student_only: bool,
    /// Institution name
    #[arg(long)]
    pub institution: Option<String>,
    /// Education level (repeatable)
    #[arg(long = "education-level")]
    pub education_level: Vec<String>,
}

impl ContextArgs {
    pub fn to_context(&self) -> QueryContext {
        QueryContext {
            location: self.location.clone(),
            field_of_study: self.field.clone(),
            student_only: self.student_only,
            institution: self.institution.clone(),
            education_level: self.education_level.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a ranked list of search queries
    Optimize {
        /// Base queries
        #[arg(required = true)]
        queries: Vec<String>,
        #[command(flatten)]
        context: ContextArgs,
        /// Target platform (repeatable), e.g. google_maps, facebook, linkedin
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
        /// Maximum number of queries to return
        #[arg(short, long)]
        max_queries: Option<usize>,
        /// Minimum quality score (0-100)
        #[arg(long)]
        min_quality: Option<f64>,
        /// Ignore recorded outcomes
        #[arg(long)]
        no_learning: bool,
        /// Skip platform-specific phrasings
        #[arg(long)]
        no_platform_optimization: bool,
    },
    /// Extract location, field, and student signal from text
    Extract {
        text: String,
    },
    /// Classify the intent of a query
    Intent {
        text: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Check a single query and suggest improvements
    Validate {
        text: String,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Show the quality breakdown of a single query
    Score {
        text: String,
        #[command(flatten)]
        context: ContextArgs,
        /// Target platform (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
    },
    /// Record how many results a query produced
    Record {
        text: String,
        results: u64,
        /// Platform the query ran on (repeatable)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
    },
    /// Show patterns learned from successful queries
    Patterns,
    /// Show recorded outcomes, newest first
    History {
        /// Number of records to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
        /// Delete all recorded outcomes
        #[arg(long)]
        clear: bool,
    },
}

/// Execute a parsed command line.
pub fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let lexicon = load_lexicon(&config)?;
    let optimizer = QueryOptimizer::new(config, lexicon);
    let json = args.json;

    match args.command {
        Command::Optimize {
            queries,
            context,
            platforms,
            max_queries,
            min_quality,
            no_learning,
            no_platform_optimization,
        } => {
            let mut options = optimizer.default_options();
            if let Some(max) = max_queries {
                options.max_queries = max;
            }
            if let Some(min) = min_quality {
                if !(0.0..=100.0).contains(&min) {
                    return Err(LeadQueryError::Config(format!(
                        "--min-quality must be within 0-100, got {min}"
                    )));
                }
                options.min_quality_score = min;
            }
            options.enable_learning &= !no_learning;
            options.enable_platform_optimization &= !no_platform_optimization;

            let store = if options.enable_learning {
                match LearningStore::from_config(&optimizer.config().learning) {
                    Ok(store) => Some(store),
                    Err(e) => {
                        tracing::warn!("Learning disabled for this run: {e}");
                        None
                    }
                }
            } else {
                None
            };

            let result = optimizer.optimize(
                &queries,
                &context.to_context(),
                &platforms,
                &options,
                store.as_ref(),
            );
            output::print_optimization(&result, &queries, json)
        }
        Command::Extract { text } => output::print_context(&optimizer.extract_context(&text), json),
        Command::Intent { text, context } => {
            output::print_intent(&optimizer.detect_intent(&text, &context.to_context()), json)
        }
        Command::Validate { text, context } => {
            output::print_validation(&text, &optimizer.validate(&text, &context.to_context()), json)
        }
        Command::Score {
            text,
            context,
            platforms,
        } => output::print_breakdown(
            &text,
            &optimizer.score(&text, &context.to_context(), &platforms),
            json,
        ),
        Command::Record {
            text,
            results,
            platforms,
        } => {
            let mut store = LearningStore::from_config(&optimizer.config().learning)?;
            let record = store.record(&text, results, &platforms)?;
            output::print_recorded(&record, store.len(), &store.describe(), json)
        }
        Command::Patterns => {
            let store = LearningStore::from_config(&optimizer.config().learning)?;
            let patterns = store.derive_patterns(optimizer.lexicon());
            output::print_patterns(&patterns, store.len(), json)
        }
        Command::History { limit, clear } => {
            let mut store = LearningStore::from_config(&optimizer.config().learning)?;
            if clear {
                let removed = store.len();
                store.clear()?;
                tracing::info!("Cleared {removed} records from {}", store.describe());
                return output::print_cleared(removed, json);
            }
            output::print_history(store.records(), limit, json)
        }
    }
}
