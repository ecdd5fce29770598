//! SQLite storage backend
//!
//! One table per [`TableKind`], all cells TEXT, keyed by `(play, row_index)`.
//! Raw tables gain columns as new plays bring new attributes; a `tables`
//! registry remembers each play's own column order and when it was written.

use super::table::Table;
use super::traits::{OpenStore, StorageError, StorageResult, TableKind, TableStore};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Transaction};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed table store
///
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Default database location: `<data dir>/hyperbard/hyperbard.db`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("hyperbard").join("hyperbard.db"))
    }

    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Registry of written tables
            CREATE TABLE IF NOT EXISTS tables (
                play TEXT NOT NULL,
                kind TEXT NOT NULL,
                columns_json TEXT NOT NULL,
                n_rows INTEGER NOT NULL,
                written_at TEXT NOT NULL,
                PRIMARY KEY (play, kind)
            );

            PRAGMA journal_mode = WAL;
            "#,
        )?;
        for kind in TableKind::ALL {
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        play TEXT NOT NULL,
                        row_index INTEGER NOT NULL,
                        PRIMARY KEY (play, row_index)
                    )",
                    quote(kind.as_str())
                ),
                [],
            )?;
        }
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Add any of `columns` the kind's table does not have yet.
    ///
    /// SQLite has no ADD COLUMN IF NOT EXISTS, so existing columns are
    /// read from `pragma_table_info` first.
    fn ensure_columns(conn: &Connection, kind: TableKind, columns: &[String]) -> StorageResult<()> {
        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let existing: HashSet<String> = stmt
            .query_map(params![kind.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;
        for column in columns {
            if !existing.contains(column) {
                conn.execute(
                    &format!(
                        "ALTER TABLE {} ADD COLUMN {} TEXT",
                        quote(kind.as_str()),
                        quote(column)
                    ),
                    [],
                )?;
            }
        }
        Ok(())
    }
}

/// Quote an identifier; attribute names such as `xml:id` need it.
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl SqliteStore {
    /// Replace one table's rows inside an open transaction
    fn replace_rows(
        tx: &Transaction<'_>,
        play: &str,
        kind: TableKind,
        table: &Table,
    ) -> StorageResult<()> {
        let reserved = ["play", "row_index"];
        if let Some(column) = table.columns().iter().find(|c| reserved.contains(&c.as_str())) {
            return Err(StorageError::ReservedColumn(column.clone()));
        }
        Self::ensure_columns(tx, kind, table.columns())?;

        tx.execute(
            &format!("DELETE FROM {} WHERE play = ?1", quote(kind.as_str())),
            params![play],
        )?;

        let column_list: String = table
            .columns()
            .iter()
            .map(|c| format!(", {}", quote(c)))
            .collect();
        let placeholders: String = (0..table.columns().len())
            .map(|i| format!(", ?{}", i + 3))
            .collect();
        let insert = format!(
            "INSERT INTO {} (play, row_index{}) VALUES (?1, ?2{})",
            quote(kind.as_str()),
            column_list,
            placeholders
        );
        let mut stmt = tx.prepare(&insert)?;
        for (index, row) in table.rows().iter().enumerate() {
            let values = [Some(play.to_string()), Some(index.to_string())]
                .into_iter()
                .chain(row.iter().cloned());
            stmt.execute(params_from_iter(values))?;
        }

        tx.execute(
            "INSERT OR REPLACE INTO tables (play, kind, columns_json, n_rows, written_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                play,
                kind.as_str(),
                serde_json::to_string(table.columns())?,
                table.len() as i64,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

impl TableStore for SqliteStore {
    fn write_table(&self, play: &str, kind: TableKind, table: &Table) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::replace_rows(&tx, play, kind, table)?;
        tx.commit()?;
        Ok(())
    }

    /// All tables go through one transaction.
    fn write_tables(&self, play: &str, tables: &[(TableKind, Table)]) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for (kind, table) in tables {
            Self::replace_rows(&tx, play, *kind, table)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove_table(&self, play: &str, kind: TableKind) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            &format!("DELETE FROM {} WHERE play = ?1", quote(kind.as_str())),
            params![play],
        )?;
        tx.execute(
            "DELETE FROM tables WHERE play = ?1 AND kind = ?2",
            params![play, kind.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn exists(&self, play: &str, kind: TableKind) -> StorageResult<bool> {
        let conn = self.lock()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM tables WHERE play = ?1 AND kind = ?2",
                params![play, kind.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn read_table(&self, play: &str, kind: TableKind) -> StorageResult<Option<Table>> {
        let conn = self.lock()?;
        let columns_json: Option<String> = conn
            .query_row(
                "SELECT columns_json FROM tables WHERE play = ?1 AND kind = ?2",
                params![play, kind.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(columns_json) = columns_json else {
            return Ok(None);
        };
        let columns: Vec<String> = serde_json::from_str(&columns_json)?;

        let mut table = Table::new(columns.clone());
        if columns.is_empty() {
            return Ok(Some(table));
        }
        let select = format!(
            "SELECT {} FROM {} WHERE play = ?1 ORDER BY row_index",
            columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", "),
            quote(kind.as_str())
        );
        let mut stmt = conn.prepare(&select)?;
        let rows = stmt.query_map(params![play], |row| {
            (0..columns.len())
                .map(|i| row.get::<_, Option<String>>(i))
                .collect::<Result<Vec<_>, _>>()
        })?;
        for row in rows {
            table.push_row(row?);
        }
        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
        let mut table = Table::new(columns.iter().copied());
        for row in rows {
            table.push_row(row.iter().map(|c| c.map(str::to_string)).collect());
        }
        table
    }

    #[test]
    fn write_read_and_replace() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = table(&["tag", "xml:id"], &[&[Some("w"), Some("w-1")], &[Some("sp"), None]]);

        assert!(!store.exists("mnd", TableKind::Raw).unwrap());
        store.write_table("mnd", TableKind::Raw, &first).unwrap();
        assert!(store.exists("mnd", TableKind::Raw).unwrap());
        assert_eq!(store.read_table("mnd", TableKind::Raw).unwrap(), Some(first));

        let second = table(&["tag"], &[&[Some("stage")]]);
        store.write_table("mnd", TableKind::Raw, &second).unwrap();
        assert_eq!(store.read_table("mnd", TableKind::Raw).unwrap(), Some(second));
    }

    #[test]
    fn plays_with_different_columns_share_a_table() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mnd = table(&["tag", "who"], &[&[Some("sp"), Some("#Puck_MND")]]);
        let rom = table(&["tag", "rend"], &[&[Some("stage"), Some("italic")]]);
        store.write_table("mnd", TableKind::Raw, &mnd).unwrap();
        store.write_table("rom", TableKind::Raw, &rom).unwrap();

        assert_eq!(store.read_table("mnd", TableKind::Raw).unwrap(), Some(mnd));
        assert_eq!(store.read_table("rom", TableKind::Raw).unwrap(), Some(rom));
        assert!(store.read_table("rom", TableKind::Cast).unwrap().is_none());
    }

    #[test]
    fn reserved_column_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let bad = table(&["play"], &[&[Some("x")]]);
        assert!(store.write_table("mnd", TableKind::Cast, &bad).is_err());
    }

    #[test]
    fn failed_batch_writes_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        let tables = vec![
            (TableKind::Cast, table(&["xml:id"], &[&[Some("Puck_MND")]])),
            (TableKind::Raw, table(&["tag"], &[&[Some("w")]])),
            (TableKind::Aggregate, table(&["row_index"], &[&[Some("0")]])),
        ];
        let err = store.write_tables("mnd", &tables).unwrap_err();
        assert!(matches!(err, StorageError::ReservedColumn(_)));
        for kind in TableKind::ALL {
            assert!(!store.exists("mnd", kind).unwrap());
        }

        store.write_tables("mnd", &tables[..2]).unwrap();
        assert!(store.exists("mnd", TableKind::Raw).unwrap());
        store.remove_table("mnd", TableKind::Raw).unwrap();
        assert!(!store.exists("mnd", TableKind::Raw).unwrap());
        assert!(store.read_table("mnd", TableKind::Raw).unwrap().is_none());
        assert!(store.exists("mnd", TableKind::Cast).unwrap());
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("hyperbard.db");
        let store = SqliteStore::open(&path).unwrap();
        store
            .write_table("mnd", TableKind::Cast, &table(&["xml:id"], &[&[Some("Puck_MND")]]))
            .unwrap();
        assert!(path.exists());
    }
}
