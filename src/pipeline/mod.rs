//! Per-document pipeline, its error taxonomy, and corpus processing

mod corpus;
mod error;
mod play;

pub use corpus::{CorpusEngine, CorpusReport, DocumentOutcome};
pub use error::{PipelineError, PipelineResult};
pub use play::{PlayPipeline, PlayTables};
