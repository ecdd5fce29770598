//! Storage backends for preprocessed tables
//!
//! Tables are written through the `TableStore` trait. `CsvStore` writes
//! the flat `<play>.<kind>.csv` files the rest of the tooling reads;
//! `SqliteStore` keeps a whole corpus in one database.

mod csv;
mod sqlite;
mod table;
mod traits;

pub use self::csv::{read_aggregates, read_csv, write_csv, write_csv_to, CsvStore};
pub use sqlite::SqliteStore;
pub use table::{Table, ANNOTATION_COLUMNS};
pub use traits::{OpenStore, StorageError, StorageResult, TableKind, TableStore};
