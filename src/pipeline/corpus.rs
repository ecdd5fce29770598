//! Corpus processing on a bounded worker pool
//!
//! Each document runs the sequential [`PlayPipeline`] on a blocking worker;
//! a semaphore bounds how many run at once. The only shared state is the
//! outcome map, written once per play. A play's tables are written
//! together or not at all.

use super::error::PipelineResult;
use super::play::PlayPipeline;
use crate::annotate::FlushPolicy;
use crate::storage::{TableKind, TableStore};
use crate::util::filename_base;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// Tables written; counts of raw records, aggregate rows, cast entries
    Processed {
        records: usize,
        rows: usize,
        cast: usize,
    },
    /// Every table already existed
    Skipped,
    /// The pipeline or a table write failed
    Failed(String),
}

impl DocumentOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, DocumentOutcome::Failed(_))
    }
}

/// Outcomes of a corpus run, sorted by play name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusReport {
    pub outcomes: Vec<(String, DocumentOutcome)>,
}

impl CorpusReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcome(&self, play: &str) -> Option<&DocumentOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == play)
            .map(|(_, outcome)| outcome)
    }

    /// Failed plays with their error messages
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|(play, outcome)| match outcome {
                DocumentOutcome::Failed(message) => Some((play.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, outcome)| outcome.is_failed())
    }

    pub fn processed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Processed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Skipped))
            .count()
    }
}

/// Runs the pipeline over many documents and writes their tables
pub struct CorpusEngine {
    store: Arc<dyn TableStore>,
    pipeline: PlayPipeline,
    /// Bounds the number of documents in flight
    workers: Arc<Semaphore>,
    force: bool,
    outcomes: Arc<DashMap<String, DocumentOutcome>>,
}

impl CorpusEngine {
    /// One worker per available core, existing tables kept
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            store,
            pipeline: PlayPipeline::new(),
            workers: Arc::new(Semaphore::new(jobs)),
            force: false,
            outcomes: Arc::new(DashMap::new()),
        }
    }

    /// Limit the number of concurrently processed documents
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(jobs.max(1)));
        self
    }

    /// Overwrite tables that already exist
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_flush(mut self, flush: FlushPolicy) -> Self {
        self.pipeline = self.pipeline.with_flush(flush);
        self
    }

    /// Process every file; returns once all have finished.
    ///
    /// A failing document is recorded and does not stop the others.
    pub async fn process(&self, files: Vec<PathBuf>) -> CorpusReport {
        tracing::info!(documents = files.len(), "processing corpus");
        let mut handles = Vec::with_capacity(files.len());

        for path in files {
            let Ok(permit) = Arc::clone(&self.workers).acquire_owned().await else {
                break;
            };
            let store = Arc::clone(&self.store);
            let pipeline = self.pipeline;
            let force = self.force;
            let play = filename_base(&path, false);
            let name = play.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                process_document(&path, &name, pipeline, store.as_ref(), force)
            });
            handles.push((play, handle));
        }

        for (play, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|e| {
                tracing::error!(play = %play, error = %e, "document worker panicked");
                DocumentOutcome::Failed(format!("worker panicked: {}", e))
            });
            if self.outcomes.insert(play.clone(), outcome).is_some() {
                tracing::warn!(play = %play, "several documents share this play name; keeping the last");
            }
        }

        let report = self.report();
        tracing::info!(
            processed = report.processed_count(),
            skipped = report.skipped_count(),
            failed = report.failures().len(),
            "corpus finished"
        );
        report
    }

    /// Outcome recorded for a play
    pub fn outcome(&self, play: &str) -> Option<DocumentOutcome> {
        self.outcomes.get(play).map(|r| r.value().clone())
    }

    /// All recorded outcomes, sorted by play name
    pub fn report(&self) -> CorpusReport {
        let mut outcomes: Vec<_> = self
            .outcomes
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        CorpusReport { outcomes }
    }
}

fn process_document(
    path: &Path,
    play: &str,
    pipeline: PlayPipeline,
    store: &dyn TableStore,
    force: bool,
) -> DocumentOutcome {
    match try_process_document(path, play, pipeline, store, force) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(play = %play, path = %path.display(), error = %e, "document failed");
            DocumentOutcome::Failed(e.to_string())
        }
    }
}

/// Tables are only written once the whole pipeline has succeeded.
fn try_process_document(
    path: &Path,
    play: &str,
    pipeline: PlayPipeline,
    store: &dyn TableStore,
    force: bool,
) -> PipelineResult<DocumentOutcome> {
    tracing::info!(play = %play, path = %path.display(), "starting document");

    let mut pending = Vec::new();
    for kind in TableKind::ALL {
        if force || !store.exists(play, kind)? {
            pending.push(kind);
        } else {
            tracing::warn!(play = %play, table = %kind, "table already exists; will not overwrite");
        }
    }
    if pending.is_empty() {
        return Ok(DocumentOutcome::Skipped);
    }

    let tables = pipeline.run_file(path)?;
    let pending: Vec<_> = pending.into_iter().map(|kind| (kind, tables.table(kind))).collect();
    store.write_tables(play, &pending)?;

    tracing::info!(
        play = %play,
        records = tables.records.len(),
        rows = tables.aggregates.len(),
        "finished document"
    );
    Ok(DocumentOutcome::Processed {
        records: tables.records.len(),
        rows: tables.aggregates.len(),
        cast: tables.cast.len(),
    })
}
