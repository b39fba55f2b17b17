//! Layered configuration loading.
//!
//! Priority, lowest first: built-in defaults, the YAML file (an explicit
//! path, else `<config dir>/leadquery/config.yaml` when present), then
//! `LEADQUERY_*` environment variables. CLI flags are applied by the
//! caller on top of the returned value.

pub mod lexicon;
pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::{LeadQueryError, Result};
use lexicon::Lexicon;
use schema::{HistoryBackend, OptimizerConfig};

pub const ENV_MAX_QUERIES: &str = "LEADQUERY_MAX_QUERIES";
pub const ENV_MIN_QUALITY: &str = "LEADQUERY_MIN_QUALITY";
pub const ENV_HISTORY_PATH: &str = "LEADQUERY_HISTORY_PATH";
pub const ENV_DISABLE_LEARNING: &str = "LEADQUERY_DISABLE_LEARNING";
pub const ENV_BACKEND: &str = "LEADQUERY_BACKEND";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "leadquery")
}

/// `<platform config dir>/config.yaml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.yaml"))
}

/// Where the history log lives when no path is configured.
pub fn default_history_path(backend: HistoryBackend) -> Result<PathBuf> {
    let dirs = project_dirs().ok_or_else(|| {
        LeadQueryError::Other("cannot determine a data directory for the history log".into())
    })?;
    let file = match backend {
        HistoryBackend::Sqlite => "history.db",
        HistoryBackend::Json | HistoryBackend::Memory => "history.json",
    };
    Ok(dirs.data_dir().join(file))
}

/// Load configuration from all sources and validate it.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<OptimizerConfig> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => read_config_file(&path)?,
            None => OptimizerConfig::default(),
        },
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<OptimizerConfig> {
    let raw = std::fs::read_to_string(path)?;
    let config: OptimizerConfig = serde_yaml::from_str(&raw)?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Apply `LEADQUERY_*` overrides read through `get`.
pub fn apply_env_overrides<F>(config: &mut OptimizerConfig, get: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(ENV_MAX_QUERIES) {
        config.options.max_queries = raw.trim().parse().map_err(|_| {
            LeadQueryError::Config(format!("{ENV_MAX_QUERIES} must be an integer, got {raw:?}"))
        })?;
    }
    if let Some(raw) = get(ENV_MIN_QUALITY) {
        config.options.min_quality_score = raw.trim().parse().map_err(|_| {
            LeadQueryError::Config(format!("{ENV_MIN_QUALITY} must be a number, got {raw:?}"))
        })?;
    }
    if let Some(raw) = get(ENV_HISTORY_PATH) {
        if !raw.trim().is_empty() {
            config.learning.history_path = Some(PathBuf::from(raw.trim()));
        }
    }
    if let Some(raw) = get(ENV_BACKEND) {
        config.learning.backend = HistoryBackend::from_str_loose(&raw).ok_or_else(|| {
            LeadQueryError::Config(format!(
                "{ENV_BACKEND} must be json, sqlite or memory, got {raw:?}"
            ))
        })?;
    }
    if let Some(raw) = get(ENV_DISABLE_LEARNING) {
        if matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes") {
            config.options.enable_learning = false;
        }
    }
    Ok(())
}

/// The configured lexicon, or the built-in one.
pub fn load_lexicon(config: &OptimizerConfig) -> Result<Lexicon> {
    match &config.lexicon_path {
        Some(path) => {
            let lexicon = Lexicon::from_yaml_file(path)?;
            tracing::info!("Loaded lexicon from {}", path.display());
            Ok(lexicon)
        }
        None => Ok(Lexicon::default()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
