//! Configuration data structures for LeadQuery.
//!
//! Defines the YAML config format: default optimization options, scoring
//! weights and thresholds, and the learning-store settings. Every section
//! is optional; missing keys take the documented defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LeadQueryError, Result};
use crate::types::OptimizeOptions;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for LeadQuery.
///
/// Loaded from a YAML file and environment variables; CLI flags override
/// per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Defaults for each optimization call.
    #[serde(default)]
    pub options: OptimizeOptions,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub learning: LearningConfig,

    /// Optional YAML file replacing parts of the built-in lexicon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            options: OptimizeOptions::default(),
            scoring: ScoringConfig::default(),
            learning: LearningConfig::default(),
            lexicon_path: None,
        }
    }
}

impl OptimizerConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        if self.learning.max_records == 0 {
            return Err(LeadQueryError::Config(
                "learning.max_records must be greater than 0".into(),
            ));
        }
        if !self.options.min_quality_score.is_finite() {
            return Err(LeadQueryError::Config(
                "options.min_quality_score must be a finite number".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Weights of the five quality sub-factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub length: f64,
    pub specificity: f64,
    pub clarity: f64,
    pub platform_fit: f64,
    pub uniqueness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            length: 0.15,
            specificity: 0.30,
            clarity: 0.25,
            platform_fit: 0.20,
            uniqueness: 0.10,
        }
    }
}

impl ScoreWeights {
    fn all(&self) -> [f64; 5] {
        [
            self.length,
            self.specificity,
            self.clarity,
            self.platform_fit,
            self.uniqueness,
        ]
    }
}

/// Scoring, dedup, and ranking knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    /// Token-Jaccard similarity at or above which two candidates are
    /// near-duplicates.
    pub similarity_threshold: f64,
    /// Share of pool uniqueness blended into the quality score.
    pub uniqueness_blend: f64,
    /// Share of the combined score taken by priority; quality takes the
    /// rest.
    pub priority_weight: f64,
    /// Uniqueness used when a candidate is scored without a pool.
    pub isolated_uniqueness: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            similarity_threshold: 0.8,
            uniqueness_blend: 0.1,
            priority_weight: 0.4,
            isolated_uniqueness: 50.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self
            .weights
            .all()
            .iter()
            .any(|w| !w.is_finite() || *w < 0.0)
        {
            return Err(LeadQueryError::Config(
                "scoring.weights must be finite and non-negative".into(),
            ));
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(LeadQueryError::Config(format!(
                "scoring.similarity_threshold must be in (0, 1], got {}",
                self.similarity_threshold
            )));
        }
        for (name, value) in [
            ("uniqueness_blend", self.uniqueness_blend),
            ("priority_weight", self.priority_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LeadQueryError::Config(format!(
                    "scoring.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.isolated_uniqueness) {
            return Err(LeadQueryError::Config(
                "scoring.isolated_uniqueness must be in [0, 100]".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LearningConfig
// ---------------------------------------------------------------------------

/// Where the outcome history lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    /// Pretty-printed JSON array in a file.
    Json,
    /// JSON array under a fixed key in a SQLite key-value table.
    Sqlite,
    /// Nothing persisted; history lasts for the process lifetime.
    Memory,
}

impl HistoryBackend {
    /// Parse from a loose string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" | "file" => Some(Self::Json),
            "sqlite" | "sqlite3" | "db" => Some(Self::Sqlite),
            "memory" | "mem" | "none" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for HistoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning-store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Cap on stored records; the oldest are evicted first.
    pub max_records: usize,
    /// Records need strictly more results than this to count as successful.
    pub min_results: u64,
    /// How many keywords the pattern miner keeps.
    pub top_keywords: usize,
    /// Shortest token (in characters) eligible as a keyword.
    pub min_keyword_len: usize,
    /// Priority added per matched keyword.
    pub keyword_boost: u8,
    /// Priority added per matched structural pattern.
    pub pattern_boost: u8,
    pub backend: HistoryBackend,
    /// History location; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_path: Option<PathBuf>,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            max_records: 1000,
            min_results: 5,
            top_keywords: 10,
            min_keyword_len: 4,
            keyword_boost: 2,
            pattern_boost: 3,
            backend: HistoryBackend::Json,
            history_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq as pa_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        pa_eq!(config.version, "1.0");
        pa_eq!(config.options.max_queries, 20);
        pa_eq!(config.options.min_quality_score, 40.0);
        pa_eq!(config.scoring.similarity_threshold, 0.8);
        pa_eq!(config.learning.max_records, 1000);
        pa_eq!(config.learning.backend, HistoryBackend::Json);
        assert!(config.lexicon_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_weights_sum_to_one() {
        let sum: f64 = ScoreWeights::default().all().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn config_empty_yaml_uses_defaults() {
        let config: OptimizerConfig = serde_yaml::from_str("{}").unwrap();
        pa_eq!(config.version, "1.0");
        pa_eq!(config.scoring, ScoringConfig::default());
        pa_eq!(config.learning, LearningConfig::default());
    }

    #[test]
    fn test_full_yaml_config() {
        let yaml = r#"
version: "1.0"
options:
  max_queries: 10
  min_quality_score: 55
  enable_learning: false
scoring:
  similarity_threshold: 0.75
  weights:
    clarity: 0.3
learning:
  max_records: 200
  backend: sqlite
  history_path: /tmp/history.db
lexicon_path: ./lexicon.yaml
"#;
        let config: OptimizerConfig = serde_yaml::from_str(yaml).unwrap();
        pa_eq!(config.options.max_queries, 10);
        pa_eq!(config.options.min_quality_score, 55.0);
        assert!(!config.options.enable_learning);
        // unspecified option keeps its default
        assert!(config.options.enable_platform_optimization);
        pa_eq!(config.scoring.similarity_threshold, 0.75);
        pa_eq!(config.scoring.weights.clarity, 0.3);
        pa_eq!(config.scoring.weights.length, 0.15);
        pa_eq!(config.learning.max_records, 200);
        pa_eq!(config.learning.backend, HistoryBackend::Sqlite);
        pa_eq!(
            config.learning.history_path,
            Some(PathBuf::from("/tmp/history.db"))
        );
        pa_eq!(config.lexicon_path, Some(PathBuf::from("./lexicon.yaml")));
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let result: std::result::Result<OptimizerConfig, _> = serde_yaml::from_str("{{invalid");
        assert!(result.is_err());
    }

    #[test_case(0.0 ; "zero threshold")]
    #[test_case(1.5 ; "above one")]
    #[test_case(f64::NAN ; "nan")]
    fn invalid_threshold_rejected(threshold: f64) {
        let mut config = OptimizerConfig::default();
        config.scoring.similarity_threshold = threshold;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, LeadQueryError::Config(_)));
    }

    #[test]
    fn negative_weight_rejected() {
        let mut config = OptimizerConfig::default();
        config.scoring.weights.clarity = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_records_rejected() {
        let mut config = OptimizerConfig::default();
        config.learning.max_records = 0;
        assert!(config.validate().is_err());
    }

    #[test_case("json", Some(HistoryBackend::Json) ; "json")]
    #[test_case("FILE", Some(HistoryBackend::Json) ; "file alias")]
    #[test_case("sqlite", Some(HistoryBackend::Sqlite) ; "sqlite")]
    #[test_case(" Memory ", Some(HistoryBackend::Memory) ; "memory padded")]
    #[test_case("redis", None ; "unknown")]
    fn backend_from_str_loose(input: &str, expected: Option<HistoryBackend>) {
        pa_eq!(HistoryBackend::from_str_loose(input), expected);
    }

    #[test]
    fn backend_display_matches_as_str() {
        for b in [
            HistoryBackend::Json,
            HistoryBackend::Sqlite,
            HistoryBackend::Memory,
        ] {
            pa_eq!(format!("{}", b), b.as_str());
            pa_eq!(HistoryBackend::from_str_loose(b.as_str()), Some(b));
        }
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let config = OptimizerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
        pa_eq!(back.scoring, config.scoring);
        pa_eq!(back.options, config.options);
    }

    proptest! {
        #[test]
        fn threshold_in_unit_interval_is_valid(t in 0.01f64..=1.0) {
            let mut config = OptimizerConfig::default();
            config.scoring.similarity_threshold = t;
            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn backend_from_str_loose_never_panics(s in "\\PC{0,30}") {
            let _ = HistoryBackend::from_str_loose(&s);
        }
    }
}
