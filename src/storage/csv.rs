//! CSV storage backend: one file per play and table kind

use super::table::Table;
use super::traits::{StorageResult, TableKind, TableStore};
use crate::aggregate::SettingAggregate;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Flat CSV files in one directory, named `<play>.<kind>.csv`
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Use `dir` for all tables, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a play's table file
    pub fn path(&self, play: &str, kind: TableKind) -> PathBuf {
        self.dir.join(format!("{}.{}.csv", play, kind))
    }
}

impl TableStore for CsvStore {
    fn write_table(&self, play: &str, kind: TableKind, table: &Table) -> StorageResult<()> {
        write_csv(self.path(play, kind), table)
    }

    fn exists(&self, play: &str, kind: TableKind) -> StorageResult<bool> {
        Ok(self.path(play, kind).is_file())
    }

    fn read_table(&self, play: &str, kind: TableKind) -> StorageResult<Option<Table>> {
        let path = self.path(play, kind);
        if !path.is_file() {
            return Ok(None);
        }
        read_csv(path).map(Some)
    }

    fn remove_table(&self, play: &str, kind: TableKind) -> StorageResult<()> {
        let path = self.path(play, kind);
        if path.is_file() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Every table is staged in a temporary file before any is renamed
    /// into place.
    fn write_tables(&self, play: &str, tables: &[(TableKind, Table)]) -> StorageResult<()> {
        let staged = tables
            .iter()
            .map(|(kind, table)| Ok((*kind, stage_csv(&self.dir, table)?)))
            .collect::<StorageResult<Vec<_>>>()?;

        let mut persisted = Vec::with_capacity(staged.len());
        for (kind, file) in staged {
            if let Err(e) = file.persist(self.path(play, kind)) {
                for written in persisted {
                    self.remove_table(play, written)?;
                }
                return Err(e.error.into());
            }
            persisted.push(kind);
        }
        Ok(())
    }
}

/// Write a table as CSV to `path`.
///
/// The table goes to a temporary file next to `path` first, so `path`
/// never holds a partial table.
pub fn write_csv(path: impl AsRef<Path>, table: &Table) -> StorageResult<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    stage_csv(dir, table)?
        .persist(path)
        .map_err(|e| e.error)?;
    Ok(())
}

fn stage_csv(dir: &Path, table: &Table) -> StorageResult<NamedTempFile> {
    let mut file = NamedTempFile::new_in(dir)?;
    write_csv_to(file.as_file_mut(), table)?;
    Ok(file)
}

/// Write a table as CSV to any writer. A table without columns writes nothing.
pub fn write_csv_to<W: Write>(writer: W, table: &Table) -> StorageResult<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    if !table.columns().is_empty() {
        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Read a CSV file with a header row; empty cells become missing values.
pub fn read_csv(path: impl AsRef<Path>) -> StorageResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut table = Table::new(reader.headers()?.iter());
    for record in reader.records() {
        let record = record?;
        table.push_row(
            record
                .iter()
                .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                .collect(),
        );
    }
    Ok(table)
}

/// Read an aggregate table written by the preprocessing step.
pub fn read_aggregates(path: impl AsRef<Path>) -> StorageResult<Vec<SettingAggregate>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let rows = reader
        .deserialize::<SettingAggregate>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_reads_back_with_missing_cells() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("data")).unwrap();

        let mut table = Table::new(["tag", "xml:id", "text"]);
        table.push_row(vec![Some("w".into()), Some("w-1".into()), Some("Now, fair".into())]);
        table.push_row(vec![Some("sp".into()), None, None]);

        assert!(!store.exists("mnd", TableKind::Raw).unwrap());
        store.write_table("mnd", TableKind::Raw, &table).unwrap();
        assert!(store.exists("mnd", TableKind::Raw).unwrap());
        assert!(store.path("mnd", TableKind::Raw).ends_with("mnd.raw.csv"));

        let contents = std::fs::read_to_string(store.path("mnd", TableKind::Raw)).unwrap();
        assert_eq!(contents, "tag,xml:id,text\nw,w-1,\"Now, fair\"\nsp,,\n");

        let back = store.read_table("mnd", TableKind::Raw).unwrap().unwrap();
        assert_eq!(back, table);
        assert!(store.read_table("mnd", TableKind::Cast).unwrap().is_none());
    }

    #[test]
    fn failed_batch_leaves_no_tables_behind() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path()).unwrap();
        // a directory where the aggregate file should go makes its rename fail
        std::fs::create_dir(store.path("toy", TableKind::Aggregate)).unwrap();

        let table = |column: &str| {
            let mut table = Table::new([column]);
            table.push_row(vec![Some("x".into())]);
            table
        };
        let tables = vec![
            (TableKind::Cast, table("xml:id")),
            (TableKind::Raw, table("tag")),
            (TableKind::Aggregate, table("act")),
        ];
        assert!(store.write_tables("toy", &tables).is_err());

        let left: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(left, vec!["toy.agg.csv"]);
        assert!(!store.exists("toy", TableKind::Cast).unwrap());
        assert!(!store.exists("toy", TableKind::Raw).unwrap());
    }

    #[test]
    fn rewrite_replaces_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toy.raw.csv");
        let mut long = Table::new(["tag"]);
        for _ in 0..50 {
            long.push_row(vec![Some("w".into())]);
        }
        write_csv(&path, &long).unwrap();
        let mut short = Table::new(["tag"]);
        short.push_row(vec![Some("sp".into())]);
        write_csv(&path, &short).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "tag\nsp\n");
    }

    #[test]
    fn aggregates_deserialize_by_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toy.agg.csv");
        std::fs::write(
            &path,
            "act,scene,stagegroup,stagegroup_raw,setting,onstage,speaker,n_lines,n_tokens\n\
             1,1,1,4,1,#A #B,#A,2,6\n",
        )
        .unwrap();
        let rows = read_aggregates(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stagegroup_raw, 4);
        assert_eq!(rows[0].onstage, "#A #B");
        assert_eq!(rows[0].n_tokens, 6);
    }
}
