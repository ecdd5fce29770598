//! Storage trait definitions

use super::table::Table;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column name is reserved: {0}")]
    ReservedColumn(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// The per-play tables the preprocessing step produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableKind {
    /// Cast list entries
    Cast,
    /// One row per structural record, with annotations
    Raw,
    /// Per-setting speech aggregates
    Aggregate,
}

impl TableKind {
    /// All kinds, in the order they are written
    pub const ALL: [TableKind; 3] = [TableKind::Cast, TableKind::Raw, TableKind::Aggregate];

    /// Short name used in file names and table names
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Cast => "cast",
            TableKind::Raw => "raw",
            TableKind::Aggregate => "agg",
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for table storage backends
///
/// Implementations must be thread-safe (Send + Sync); the corpus engine
/// writes from several worker threads at once.
pub trait TableStore: Send + Sync {
    /// Write a play's table, replacing any previous version
    fn write_table(&self, play: &str, kind: TableKind, table: &Table) -> StorageResult<()>;

    /// Whether a play's table has been written
    fn exists(&self, play: &str, kind: TableKind) -> StorageResult<bool>;

    /// Read a play's table back
    fn read_table(&self, play: &str, kind: TableKind) -> StorageResult<Option<Table>>;

    /// Delete a play's table; a missing table is not an error
    fn remove_table(&self, play: &str, kind: TableKind) -> StorageResult<()>;

    /// Write several tables of one play, all or nothing.
    ///
    /// On failure, tables already written by this call are removed again.
    fn write_tables(&self, play: &str, tables: &[(TableKind, Table)]) -> StorageResult<()> {
        for (i, (kind, table)) in tables.iter().enumerate() {
            if let Err(e) = self.write_table(play, *kind, table) {
                for (written, _) in &tables[..i] {
                    if let Err(cleanup) = self.remove_table(play, *written) {
                        tracing::error!(play = %play, table = %written, error = %cleanup, "failed to remove table");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Extension trait for opening stores from paths
pub trait OpenStore: TableStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
