//! Configuration loaded from YAML
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags override individual fields.

use crate::annotate::FlushPolicy;
use crate::storage::SqliteStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where preprocessed tables go
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    #[default]
    Csv,
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown store '{}' (expected 'csv' or 'sqlite')", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Onstage flush policy
    pub flush: FlushPolicy,
    /// Directory for `<play>.{cast,raw,agg}.csv`
    pub output_dir: PathBuf,
    /// Directory for graph representation files
    pub graph_dir: PathBuf,
    /// Worker count for corpus processing
    pub jobs: usize,
    /// Overwrite existing tables
    pub force: bool,
    pub store: StoreBackend,
    /// SQLite database file; see [`Config::sqlite_path`]
    pub sqlite_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flush: FlushPolicy::default(),
            output_dir: PathBuf::from("data"),
            graph_dir: PathBuf::from("graphdata"),
            jobs: default_jobs(),
            force: false,
            store: StoreBackend::default(),
            sqlite_path: None,
        }
    }
}

impl Config {
    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse YAML; blank input yields the defaults
    pub fn from_yaml(contents: &str) -> ConfigResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The configured database file, else `<data dir>/hyperbard/hyperbard.db`,
    /// else `hyperbard.db` in the output directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .or_else(SqliteStore::default_path)
            .unwrap_or_else(|| self.output_dir.join("hyperbard.db"))
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
