//! Persistence backends for the outcome history.
//!
//! The store keeps the full list in memory and hands the whole list to
//! [`HistoryRepository::save`] after every append, so backends only need
//! load/save of one JSON array.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::types::HistoricalRecord;

/// Key under which the SQLite backend stores the history array.
pub const HISTORY_KEY: &str = "query_optimization_history";

const CREATE_KV_STORE: &str = "\
CREATE TABLE IF NOT EXISTS kv_store (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at TEXT NOT NULL
)";

/// Where the history log is read from and written to.
pub trait HistoryRepository {
    /// Every stored record, oldest first. A missing log is empty, not an
    /// error.
    fn load(&self) -> Result<Vec<HistoricalRecord>>;

    /// Replace the stored log with `records`.
    fn save(&mut self, records: &[HistoricalRecord]) -> Result<()>;

    /// Human-readable location, for logs and the CLI.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Keeps the log for the lifetime of the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    records: Vec<HistoricalRecord>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }
}

impl HistoryRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<HistoricalRecord>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        self.records = records.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

/// Pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<HistoricalRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        // Readers never observe a partially written log.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// SQLite
// ---------------------------------------------------------------------------

/// The JSON array stored under [`HISTORY_KEY`] in a `kv_store` table.
pub struct SqliteRepository {
    conn: Connection,
    label: String,
}

impl SqliteRepository {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn, path.display().to_string())
    }

    /// Like [`open`](Self::open), but a file that SQLite cannot open is
    /// moved aside to `<name>.corrupt` and a fresh database takes its place.
    pub fn open_or_reset(path: &Path) -> Result<Self> {
        match Self::open(path) {
            Ok(repo) => Ok(repo),
            Err(e) if path.exists() => {
                let mut aside = path.as_os_str().to_owned();
                aside.push(".corrupt");
                let aside = PathBuf::from(aside);
                tracing::warn!(
                    "Discarding unreadable history database {}: {e}; moved to {}",
                    path.display(),
                    aside.display()
                );
                std::fs::rename(path, &aside)?;
                for suffix in ["-wal", "-shm"] {
                    let mut name = path.as_os_str().to_owned();
                    name.push(suffix);
                    let sidecar = Path::new(&name);
                    if sidecar.exists() {
                        std::fs::remove_file(sidecar)?;
                    }
                }
                Self::open(path)
            }
            Err(e) => Err(e),
        }
    }

    /// A private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, label: String) -> Result<Self> {
        conn.execute_batch(CREATE_KV_STORE)?;
        Ok(Self { conn, label })
    }
}

impl HistoryRepository for SqliteRepository {
    fn load(&self) -> Result<Vec<HistoricalRecord>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![HISTORY_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&mut self, records: &[HistoricalRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![HISTORY_KEY, json, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
