//! Lexical data the engine reads: gazetteer, field synonyms, keyword sets,
//! and the platform table.
//!
//! The algorithm never hard-codes a place or a field name; everything it
//! recognises comes from a [`Lexicon`]. The built-in data targets Sri
//! Lankan student and business searches and can be replaced or extended
//! with a YAML file (missing keys fall back to the built-in values).

use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::text::find_term;

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

/// `(place, landmarks)`. Landmarks are nearby localities appended as
/// local-context expansions.
const PLACES: &[(&str, &[&str])] = &[
    ("kandy", &["peradeniya", "katugastota", "kundasale"]),
    ("colombo", &["bambalapitiya", "kollupitiya", "nugegoda", "maharagama"]),
    ("galle", &["karapitiya", "unawatuna"]),
    ("jaffna", &["nallur", "chunnakam"]),
    ("kurunegala", &["wariyapola"]),
    ("matara", &["wellamadama"]),
    ("negombo", &["katunayake"]),
    ("anuradhapura", &["mihintale"]),
    ("batticaloa", &["vantharumoolai"]),
    ("ratnapura", &["belihuloya"]),
    ("badulla", &["bandarawela"]),
    ("moratuwa", &["katubedda"]),
    ("gampaha", &["kelaniya", "yakkala"]),
];

/// `(canonical field, synonyms)`.
const FIELDS: &[(&str, &[&str])] = &[
    (
        "ICT",
        &[
            "Information Technology",
            "Computer Science",
            "Information and Communication Technology",
            "Software Engineering",
            "IT",
        ],
    ),
    ("Engineering", &["Civil Engineering", "Mechanical Engineering", "Electrical Engineering"]),
    ("Medicine", &["Medical", "MBBS", "Health Sciences"]),
    ("Management", &["Business Management", "Business Administration", "Commerce", "BBA"]),
    ("Accounting", &["Finance", "CIMA", "ACCA"]),
    ("Law", &["LLB", "Legal Studies"]),
    ("Arts", &["Humanities", "Social Sciences"]),
    ("Science", &["Physical Science", "Biological Science"]),
];

/// Generic word-level substitutions, applied to any matching token.
const WORD_SYNONYMS: &[(&str, &[&str])] = &[
    ("students", &["learners", "undergraduates"]),
    ("student", &["learner", "undergraduate"]),
    ("university", &["campus"]),
    ("college", &["institute"]),
    ("business", &["company"]),
    ("businesses", &["companies"]),
    ("shop", &["store"]),
    ("shops", &["stores"]),
];

const LOCATION_PREPOSITIONS: &[&str] = &["in", "near"];

/// Words that may follow a preposition without naming a place.
const LOCATION_STOPWORDS: &[&str] = &[
    "the", "a", "an", "my", "our", "your", "their", "this", "that", "it", "order", "need",
    "person", "general", "particular", "total", "progress", "touch",
];

const STUDENT_KEYWORDS: &[&str] = &[
    "student",
    "students",
    "undergraduate",
    "undergraduates",
    "graduate",
    "graduates",
];

const VAGUE_WORDS: &[&str] = &["related", "things", "stuff", "etc"];

const ACTION_PHRASES: &[&str] = &["find", "search", "looking for"];

const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "campus",
    "school",
    "academy",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "student",
    "students",
    "undergraduate",
    "undergraduates",
    "graduate",
    "graduates",
    "bachelor",
    "degree",
    "diploma",
    "university",
    "college",
];

const BUSINESS_KEYWORDS: &[&str] = &[
    "business",
    "businesses",
    "company",
    "companies",
    "shop",
    "shops",
    "store",
    "stores",
    "restaurant",
    "restaurants",
    "agency",
    "firm",
];

const JOB_KEYWORDS: &[&str] = &[
    "job",
    "jobs",
    "hiring",
    "vacancy",
    "vacancies",
    "career",
    "careers",
    "internship",
    "internships",
];

/// Language that points at individual people or profiles.
const INDIVIDUAL_TERMS: &[&str] = &[
    "student",
    "students",
    "individual",
    "individuals",
    "people",
    "person",
    "profile",
    "profiles",
    "page",
    "group",
];

const PROFESSIONAL_TERMS: &[&str] = &[
    "professional",
    "professionals",
    "graduate",
    "graduates",
    "career",
    "engineer",
    "engineers",
    "intern",
    "interns",
    "network",
];

const PLATFORMS: &[(&str, PlatformKind)] = &[
    ("google_maps", PlatformKind::Map),
    ("bing_maps", PlatformKind::Map),
    ("apple_maps", PlatformKind::Map),
    ("yelp", PlatformKind::Map),
    ("facebook", PlatformKind::Social),
    ("instagram", PlatformKind::Social),
    ("twitter", PlatformKind::Social),
    ("tiktok", PlatformKind::Social),
    ("linkedin", PlatformKind::Professional),
];

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// What kind of audience a target platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    Map,
    Social,
    Professional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub landmarks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl FieldGroup {
    /// Canonical name followed by every synonym.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSynonyms {
    pub word: String,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub name: String,
    pub kind: PlatformKind,
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub places: Vec<Place>,
    pub location_prepositions: Vec<String>,
    pub location_stopwords: Vec<String>,
    pub fields: Vec<FieldGroup>,
    pub student_keywords: Vec<String>,
    pub word_synonyms: Vec<WordSynonyms>,
    pub vague_words: Vec<String>,
    pub action_phrases: Vec<String>,
    pub institution_keywords: Vec<String>,
    pub education_keywords: Vec<String>,
    pub business_keywords: Vec<String>,
    pub job_keywords: Vec<String>,
    pub individual_terms: Vec<String>,
    pub professional_terms: Vec<String>,
    pub platforms: Vec<PlatformEntry>,

    #[serde(skip)]
    location_regex: OnceLock<Option<Regex>>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            places: PLACES
                .iter()
                .map(|(name, landmarks)| Place {
                    name: name.to_string(),
                    landmarks: owned(landmarks),
                })
                .collect(),
            location_prepositions: owned(LOCATION_PREPOSITIONS),
            location_stopwords: owned(LOCATION_STOPWORDS),
            fields: FIELDS
                .iter()
                .map(|(canonical, synonyms)| FieldGroup {
                    canonical: canonical.to_string(),
                    synonyms: owned(synonyms),
                })
                .collect(),
            student_keywords: owned(STUDENT_KEYWORDS),
            word_synonyms: WORD_SYNONYMS
                .iter()
                .map(|(word, synonyms)| WordSynonyms {
                    word: word.to_string(),
                    synonyms: owned(synonyms),
                })
                .collect(),
            vague_words: owned(VAGUE_WORDS),
            action_phrases: owned(ACTION_PHRASES),
            institution_keywords: owned(INSTITUTION_KEYWORDS),
            education_keywords: owned(EDUCATION_KEYWORDS),
            business_keywords: owned(BUSINESS_KEYWORDS),
            job_keywords: owned(JOB_KEYWORDS),
            individual_terms: owned(INDIVIDUAL_TERMS),
            professional_terms: owned(PROFESSIONAL_TERMS),
            platforms: PLATFORMS
                .iter()
                .map(|(name, kind)| PlatformEntry {
                    name: name.to_string(),
                    kind: *kind,
                })
                .collect(),
            location_regex: OnceLock::new(),
        }
    }
}

impl Lexicon {
    /// Parse a YAML lexicon; absent keys keep their built-in values.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// `\b(?:in|near)\s+(?:the\s+)?(word)` built from the preposition list.
    fn location_regex(&self) -> Option<&Regex> {
        self.location_regex
            .get_or_init(|| {
                if self.location_prepositions.is_empty() {
                    return None;
                }
                let alternation = self
                    .location_prepositions
                    .iter()
                    .map(|p| regex::escape(p.trim()))
                    .collect::<Vec<_>>()
                    .join("|");
                let pattern =
                    format!(r"(?i)\b(?:{alternation})\s+(?:the\s+)?([a-z][a-z'-]*)");
                Regex::new(&pattern).ok()
            })
            .as_ref()
    }

    /// The first place named after a location preposition ("in X",
    /// "near X"), skipping stopwords.
    pub fn prepositional_location<'t>(&self, text: &'t str) -> Option<&'t str> {
        let re = self.location_regex()?;
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|word| !self.is_location_stopword(word))
    }

    fn is_location_stopword(&self, word: &str) -> bool {
        self.location_stopwords
            .iter()
            .any(|s| s.eq_ignore_ascii_case(word))
    }

    /// First gazetteer place mentioned anywhere in `text`, in table order.
    pub fn find_place(&self, text: &str) -> Option<&Place> {
        self.places.iter().find(|p| find_term(text, &p.name).is_some())
    }

    /// Look a place up by name (case-insensitive).
    pub fn place(&self, name: &str) -> Option<&Place> {
        let name = name.trim();
        self.places.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// First field group with any term mentioned in `text`, plus the byte
    /// range of the term that matched.
    pub fn find_field(&self, text: &str) -> Option<(&FieldGroup, Range<usize>)> {
        self.fields.iter().find_map(|group| {
            group
                .terms()
                .find_map(|term| find_term(text, term))
                .map(|range| (group, range))
        })
    }

    /// The group whose canonical name or synonym equals `name`.
    pub fn field_group(&self, name: &str) -> Option<&FieldGroup> {
        let name = name.trim();
        self.fields
            .iter()
            .find(|g| g.terms().any(|t| t.eq_ignore_ascii_case(name)))
    }

    pub fn word_synonyms(&self, word: &str) -> Option<&[String]> {
        self.word_synonyms
            .iter()
            .find(|w| w.word.eq_ignore_ascii_case(word))
            .map(|w| w.synonyms.as_slice())
    }

    /// Resolve a platform name; `"Google Maps"`, `"google-maps"`, and
    /// `"google_maps"` are equivalent.
    pub fn platform_kind(&self, platform: &str) -> Option<PlatformKind> {
        let key = platform_key(platform);
        self.platforms
            .iter()
            .find(|p| platform_key(&p.name) == key)
            .map(|p| p.kind)
    }

    /// Whether any of `platforms` is of `kind`.
    pub fn targets(&self, platforms: &[String], kind: PlatformKind) -> bool {
        platforms
            .iter()
            .any(|p| self.platform_kind(p) == Some(kind))
    }
}

fn platform_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Whether any of `terms` occurs in `text` on word boundaries.
pub fn mentions_any(text: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| find_term(text, t).is_some())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
