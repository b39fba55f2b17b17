//! Outcome history and the learning loop built on it.
//!
//! A [`LearningStore`] owns an in-memory copy of the history (the source
//! of truth for reads) and a [`HistoryRepository`] it writes the whole log
//! to after every append. Optimization reads the store; only
//! [`LearningStore::record`] and [`LearningStore::clear`] change it.

pub mod patterns;
pub mod repository;

use chrono::{DateTime, Utc};

use crate::config::default_history_path;
use crate::config::lexicon::Lexicon;
use crate::config::schema::{HistoryBackend, LearningConfig};
use crate::error::Result;
use crate::types::HistoricalRecord;

pub use patterns::{boost, derive_patterns, structural_tags, LearnedPatterns, StructuralTag};
pub use repository::{HistoryRepository, JsonFileRepository, MemoryRepository, SqliteRepository};

pub struct LearningStore {
    repository: Box<dyn HistoryRepository>,
    records: Vec<HistoricalRecord>,
    config: LearningConfig,
}

impl LearningStore {
    /// Load the history from `repository`. An unreadable or corrupt log is
    /// discarded with a warning and the store starts empty.
    pub fn open(repository: Box<dyn HistoryRepository>, config: LearningConfig) -> Self {
        let mut records = match repository.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "Discarding unreadable query history at {}: {e}",
                    repository.describe()
                );
                Vec::new()
            }
        };
        evict_oldest(&mut records, config.max_records);
        tracing::debug!(
            "Loaded {} history records from {}",
            records.len(),
            repository.describe()
        );
        Self {
            repository,
            records,
            config,
        }
    }

    /// A store that persists nothing.
    pub fn in_memory(config: LearningConfig) -> Self {
        Self::open(Box::new(MemoryRepository::new()), config)
    }

    /// Build the backend named by `config` and open it.
    pub fn from_config(config: &LearningConfig) -> Result<Self> {
        let repository: Box<dyn HistoryRepository> = match config.backend {
            HistoryBackend::Memory => Box::new(MemoryRepository::new()),
            HistoryBackend::Json => Box::new(JsonFileRepository::new(history_path(config)?)),
            HistoryBackend::Sqlite => {
                Box::new(SqliteRepository::open_or_reset(&history_path(config)?)?)
            }
        };
        Ok(Self::open(repository, config.clone()))
    }

    /// Append an outcome stamped with the current time and persist the log.
    pub fn record(
        &mut self,
        text: &str,
        results_count: u64,
        platforms: &[String],
    ) -> Result<HistoricalRecord> {
        self.record_at(text, results_count, platforms, Utc::now())
    }

    /// [`record`](Self::record) with an explicit timestamp.
    pub fn record_at(
        &mut self,
        text: &str,
        results_count: u64,
        platforms: &[String],
        timestamp: DateTime<Utc>,
    ) -> Result<HistoricalRecord> {
        let record = HistoricalRecord::new(text, results_count, platforms.to_vec(), timestamp);
        self.records.push(record.clone());
        evict_oldest(&mut self.records, self.config.max_records);

        if let Err(e) = self.repository.save(&self.records) {
            tracing::warn!(
                "Recorded outcome kept in memory only; saving to {} failed: {e}",
                self.repository.describe()
            );
            return Err(e);
        }
        tracing::info!(
            "Recorded outcome for {:?} ({} results, {} records stored)",
            record.query_text,
            record.results_count,
            self.records.len()
        );
        Ok(record)
    }

    /// Stored records, oldest first.
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    pub fn describe(&self) -> String {
        self.repository.describe()
    }

    pub fn derive_patterns(&self, lexicon: &Lexicon) -> LearnedPatterns {
        derive_patterns(&self.records, lexicon, &self.config)
    }

    /// Drop every record, in memory and in the backend.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.repository.save(&self.records)
    }
}

fn history_path(config: &LearningConfig) -> Result<std::path::PathBuf> {
    match &config.history_path {
        Some(path) => Ok(path.clone()),
        None => default_history_path(config.backend),
    }
}

fn evict_oldest(records: &mut Vec<HistoricalRecord>, cap: usize) {
    if records.len() > cap {
        let excess = records.len() - cap;
        records.drain(..excess);
    }
}
