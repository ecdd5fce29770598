//! Generic column/row tables
//!
//! Raw record tables have a column set that depends on the attributes a
//! play uses, so tables are kept untyped: named columns, and rows of
//! optional text cells. Missing values are `None` and become empty cells.

use crate::aggregate::{SettingAggregate, AGGREGATE_COLUMNS};
use crate::annotate::AnnotatedRecord;
use crate::tei::{attr, CastEntry};
use crate::util::normalize_characters;
use std::collections::HashMap;

/// Annotation columns appended to the raw table, in order
pub const ANNOTATION_COLUMNS: [&str; 5] = ["act", "scene", "onstage", "stagegroup_raw", "speaker"];

/// Named columns and rows of optional cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; short rows are padded with missing cells, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row`, `column`; `None` when missing
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// The raw table: `tag`, attributes in first-appearance order (`text`
    /// after the first record's attributes), then the annotations.
    pub fn from_records(records: &[AnnotatedRecord]) -> Self {
        let mut columns = ColumnIndex::default();
        columns.add("tag");
        for (i, annotated) in records.iter().enumerate() {
            for key in annotated.record.attributes.keys() {
                columns.add(key);
            }
            if i == 0 {
                columns.add("text");
            }
        }
        if records.is_empty() {
            columns.add("text");
        }
        for name in ANNOTATION_COLUMNS {
            columns.add(name);
        }

        let mut table = Table::new(columns.names.clone());
        for annotated in records {
            let mut row = vec![None; table.columns.len()];
            let mut set = |name: &str, value: Option<String>| {
                if let Some(&index) = columns.positions.get(name) {
                    row[index] = value;
                }
            };
            set("tag", Some(annotated.record.tag.clone()));
            for (key, value) in annotated.record.attributes.iter() {
                let value = if key == attr::WHO {
                    normalize_characters(value)
                } else {
                    value.to_string()
                };
                set(key, Some(value));
            }
            set("text", annotated.record.text.clone());
            set("act", Some(annotated.act.to_string()));
            set("scene", Some(annotated.scene.to_string()));
            set("onstage", Some(annotated.onstage_string()));
            set("stagegroup_raw", Some(annotated.stagegroup.to_string()));
            set("speaker", annotated.speaker.clone());
            table.rows.push(row);
        }
        table
    }

    /// The aggregate table, in its fixed column order
    pub fn from_aggregates(rows: &[SettingAggregate]) -> Self {
        let mut table = Table::new(AGGREGATE_COLUMNS);
        for row in rows {
            table.rows.push(vec![
                Some(row.act.to_string()),
                Some(row.scene.to_string()),
                Some(row.stagegroup.to_string()),
                Some(row.stagegroup_raw.to_string()),
                Some(row.setting.to_string()),
                Some(row.onstage.clone()),
                Some(row.speaker.clone()),
                Some(row.n_lines.to_string()),
                Some(row.n_tokens.to_string()),
            ]);
        }
        table
    }

    /// The cast table: attributes in first-appearance order
    pub fn from_cast(entries: &[CastEntry]) -> Self {
        let mut columns = ColumnIndex::default();
        for entry in entries {
            for key in entry.attributes.keys() {
                columns.add(key);
            }
        }
        let mut table = Table::new(columns.names.clone());
        for entry in entries {
            let mut row = vec![None; table.columns.len()];
            for (key, value) in entry.attributes.iter() {
                if let Some(&index) = columns.positions.get(key) {
                    row[index] = Some(value.to_string());
                }
            }
            table.rows.push(row);
        }
        table
    }
}

/// Column names in insertion order, deduplicated
#[derive(Default)]
struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn add(&mut self, name: &str) {
        if !self.positions.contains_key(name) {
            self.positions.insert(name.to_string(), self.names.len());
            self.names.push(name.to_string());
        }
    }
}
