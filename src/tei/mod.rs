//! TEI drama markup: parsing, flattening, speech ownership, cast
//!
//! The XML itself is parsed by `roxmltree`; everything here walks the
//! resulting tree and never mutates it.

mod cast;
mod flatten;
mod record;
mod speech;

pub use cast::{cast_entries, CastEntry};
pub use flatten::{body, flatten, is_leaf, structural_records, text_content};
pub use record::{attr, kind, tag, Attributes, RecordLocator, StructuralRecord};
pub use speech::{speech_acts, SpeechAct};

use crate::pipeline::PipelineResult;
use roxmltree::{Document, ParsingOptions};

/// Parse TEI text into a document tree.
///
/// DTDs are allowed; Folger files ship with an `xml-model` instruction
/// and some editions declare entities.
pub fn parse(xml: &str) -> PipelineResult<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Ok(Document::parse_with_options(xml, options)?)
}
