//! Core domain types for LeadQuery.
//!
//! Context hints, candidate queries, classified intent, validation
//! results, and the historical outcome records the learning loop reads.
//! JSON field names are camelCase so the persisted history log and the
//! CLI's `--json` output share one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest intrinsic priority a candidate can carry.
pub const MIN_PRIORITY: u8 = 1;
/// Highest intrinsic priority; reserved for the user's own text at
/// generation time (learning boosts may lift other candidates to it).
pub const MAX_PRIORITY: u8 = 10;

// ---------------------------------------------------------------------------
// QueryContext
// ---------------------------------------------------------------------------

/// Structured hints that accompany a free-text search intent.
///
/// Any field may be absent; absent fields simply do not contribute to
/// expansion or scoring. The optimizer fills gaps from the raw text before
/// generating candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    pub student_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education_level: Vec<String>,
}

impl QueryContext {
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field_of_study = Some(field.into());
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn student_only(mut self, student_only: bool) -> Self {
        self.student_only = student_only;
        self
    }

    /// Fill every absent field from `other`, leaving present ones alone.
    /// `student_only` is OR-ed.
    pub fn fill_gaps(&mut self, other: &QueryContext) {
        if self.location.is_none() {
            self.location = other.location.clone();
        }
        if self.field_of_study.is_none() {
            self.field_of_study = other.field_of_study.clone();
        }
        if self.institution.is_none() {
            self.institution = other.institution.clone();
        }
        if self.education_level.is_empty() {
            self.education_level = other.education_level.clone();
        }
        self.student_only |= other.student_only;
    }
}

// ---------------------------------------------------------------------------
// CandidateQuery
// ---------------------------------------------------------------------------

/// Which expansion produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Original,
    Location,
    Field,
    Synonym,
    Education,
    LocalContext,
    Platform,
    Intent,
}

impl Source {
    /// Tie-break rank when two candidates share a priority (lower wins):
    /// original > location > field > education > local_context >
    /// platform > intent > synonym.
    pub fn tie_rank(self) -> u8 {
        match self {
            Self::Original => 0,
            Self::Location => 1,
            Self::Field => 2,
            Self::Education => 3,
            Self::LocalContext => 4,
            Self::Platform => 5,
            Self::Intent => 6,
            Self::Synonym => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Location => "location",
            Self::Field => "field",
            Self::Synonym => "synonym",
            Self::Education => "education",
            Self::LocalContext => "local_context",
            Self::Platform => "platform",
            Self::Intent => "intent",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated search-string variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    /// Trimmed, non-empty search text.
    pub text: String,
    /// Intrinsic importance, always within `MIN_PRIORITY..=MAX_PRIORITY`.
    pub priority: u8,
    pub source: Source,
}

impl CandidateQuery {
    /// Build a candidate, trimming the text and clamping the priority.
    pub fn new(text: impl AsRef<str>, priority: u8, source: Source) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
            priority: clamp_priority(priority as i32),
            source,
        }
    }

    /// The user's own text: priority 10, source `original`.
    pub fn original(text: impl AsRef<str>) -> Self {
        Self::new(text, MAX_PRIORITY, Source::Original)
    }

    /// A variant derived from this candidate, one priority step lower.
    pub fn derived(&self, text: impl AsRef<str>, source: Source) -> Self {
        Self::new(text, self.priority.saturating_sub(1), source)
    }
}

/// Clamp an arbitrary priority into `MIN_PRIORITY..=MAX_PRIORITY`.
pub fn clamp_priority(priority: i32) -> u8 {
    priority.clamp(MIN_PRIORITY as i32, MAX_PRIORITY as i32) as u8
}

/// Quality sub-factors of one query, each in `[0, 100]`, and their
/// weighted composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    pub length: f64,
    pub specificity: f64,
    pub clarity: f64,
    pub platform_fit: f64,
    pub uniqueness: f64,
    /// Weighted sum, rounded to the nearest integer.
    pub score: f64,
}

/// A candidate after quality scoring and prioritization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: CandidateQuery,
    /// Blended quality in `[0, 100]`.
    pub quality_score: f64,
    /// Pool-relative uniqueness in `[0, 100]`.
    pub uniqueness: f64,
    /// Final blend of quality and priority used for ordering.
    pub combined_score: f64,
}

impl ScoredCandidate {
    pub fn text(&self) -> &str {
        &self.candidate.text
    }

    pub fn priority(&self) -> u8 {
        self.candidate.priority
    }
}

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// Coarse classification of what the user is searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    StudentSearch,
    BusinessSearch,
    JobSearch,
    LocationSearch,
    Mixed,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentSearch => "student_search",
            Self::BusinessSearch => "business_search",
            Self::JobSearch => "job_search",
            Self::LocationSearch => "location_search",
            Self::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Individual,
    Business,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    Undergraduate,
    Graduate,
}

/// Named entities pulled out of the query text (falling back to context).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_level: Option<EducationLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    /// Always within `0..=100`.
    pub confidence: u8,
    pub entities: Entities,
}

// ---------------------------------------------------------------------------
// HistoricalRecord
// ---------------------------------------------------------------------------

/// One past query outcome reported by the scraping pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalRecord {
    /// Lowercased, trimmed query text.
    pub query_text: String,
    pub results_count: u64,
    pub platforms: Vec<String>,
    pub timestamp: DateTime<Utc>,
    /// 100 when the query returned anything, else 0.
    pub success_rate: f64,
}

impl HistoricalRecord {
    pub fn new(
        text: &str,
        results_count: u64,
        platforms: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            query_text: text.trim().to_lowercase(),
            results_count,
            platforms,
            timestamp,
            success_rate: if results_count > 0 { 100.0 } else { 0.0 },
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimatedResults {
    High,
    Medium,
    Low,
}

impl EstimatedResults {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub estimated_results: EstimatedResults,
}

// ---------------------------------------------------------------------------
// Optimization options & output
// ---------------------------------------------------------------------------

/// Per-call switches for [`crate::optimizer::QueryOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    pub enable_learning: bool,
    pub enable_platform_optimization: bool,
    pub max_queries: usize,
    pub min_quality_score: f64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            enable_learning: true,
            enable_platform_optimization: true,
            max_queries: 20,
            min_quality_score: 40.0,
        }
    }
}

/// Pool sizes through the pipeline plus the mean surviving quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub generated: usize,
    pub after_dedup: usize,
    pub after_quality_filter: usize,
    pub returned: usize,
    pub average_quality: f64,
    pub learning_applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub queries: Vec<ScoredCandidate>,
    pub intent: Intent,
    pub analytics: Analytics,
}

impl OptimizationResult {
    /// The ranked list as plain strings, ready for the scraper.
    pub fn query_strings(&self) -> Vec<String> {
        self.queries.iter().map(|q| q.candidate.text.clone()).collect()
    }

    /// Ranked strings, or the trimmed non-empty base queries when nothing
    /// survived the quality filter.
    pub fn query_strings_or(&self, base_queries: &[String]) -> Vec<String> {
        if self.queries.is_empty() {
            base_queries
                .iter()
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            self.query_strings()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
