//! Hyperbard: stage-presence reconstruction for TEI drama
//!
//! Turns TEI-encoded plays into tables of who is on stage, who speaks,
//! and how much, then derives graph and hypergraph representations of
//! character co-presence and ranks characters by degree.
//!
//! # Pipeline
//!
//! - **tei**: flatten the document body into ordered structural records
//! - **annotate**: act/scene numbers, onstage sets, stage groups, speakers
//! - **aggregate**: token and line counts per setting
//! - **represent** / **ranking**: graphs built from the aggregate table
//!
//! # Example
//!
//! ```
//! use hyperbard::PlayPipeline;
//!
//! let xml = r##"<TEI><text><body>
//!   <div type="act" n="1">
//!     <stage type="entrance" who="#A #B"/>
//!     <sp who="#A"><l xml:id="l-1" n="1.1.1"><w xml:id="w-1" n="1.1.1">Hail</w></l></sp>
//!   </div>
//! </body></text></TEI>"##;
//!
//! let tables = PlayPipeline::new().run(xml).unwrap();
//! assert_eq!(tables.aggregates[0].onstage, "#A #B");
//! ```

pub mod aggregate;
pub mod annotate;
pub mod config;
pub mod pipeline;
pub mod ranking;
pub mod represent;
pub mod storage;
pub mod tei;
pub mod util;

pub use aggregate::{aggregate, SettingAggregate};
pub use annotate::{annotate, AnnotatedRecord, CharacterSet, FlushPolicy};
pub use config::{Config, ConfigError, StoreBackend};
pub use pipeline::{
    CorpusEngine, CorpusReport, DocumentOutcome, PipelineError, PipelineResult, PlayPipeline,
    PlayTables,
};
pub use ranking::character_ranking;
pub use represent::{write_representations, Representation};
pub use storage::{
    read_aggregates, CsvStore, OpenStore, SqliteStore, StorageError, StorageResult, Table,
    TableKind, TableStore,
};
pub use tei::{CastEntry, StructuralRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
