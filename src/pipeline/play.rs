//! The per-document pipeline: TEI text → cast, raw and aggregate tables

use super::error::PipelineResult;
use crate::aggregate::{aggregate, SettingAggregate};
use crate::annotate::{annotate, AnnotatedRecord, FlushPolicy};
use crate::storage::{Table, TableKind};
use crate::tei::{self, CastEntry};
use std::path::Path;

/// Everything derived from one play
#[derive(Debug, Clone)]
pub struct PlayTables {
    pub cast: Vec<CastEntry>,
    pub records: Vec<AnnotatedRecord>,
    pub aggregates: Vec<SettingAggregate>,
}

impl PlayTables {
    /// The table of the given kind
    pub fn table(&self, kind: TableKind) -> Table {
        match kind {
            TableKind::Cast => Table::from_cast(&self.cast),
            TableKind::Raw => Table::from_records(&self.records),
            TableKind::Aggregate => Table::from_aggregates(&self.aggregates),
        }
    }
}

/// Sequential pipeline over a single document
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayPipeline {
    flush: FlushPolicy,
}

impl PlayPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set where the onstage tracker flushes
    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.flush = flush;
        self
    }

    pub fn flush(&self) -> FlushPolicy {
        self.flush
    }

    /// Run every stage over TEI text.
    pub fn run(&self, xml: &str) -> PipelineResult<PlayTables> {
        let document = tei::parse(xml)?;
        let cast = tei::cast_entries(&document);
        let body = tei::body(&document)?;
        let speech = tei::speech_acts(body);
        let records = annotate(tei::flatten(body), &speech, self.flush)?;
        let aggregates = aggregate(&records)?;
        Ok(PlayTables {
            cast,
            records,
            aggregates,
        })
    }

    /// Read a file and run the pipeline over it
    pub fn run_file(&self, path: impl AsRef<Path>) -> PipelineResult<PlayTables> {
        let xml = std::fs::read_to_string(path)?;
        self.run(&xml)
    }
}
