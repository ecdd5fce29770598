//! Structural annotation of flattened records
//!
//! Each stage reads the records and yields one new column; [`annotate`]
//! zips the columns into [`AnnotatedRecord`]s. Nothing is written back
//! into the input sequence.

mod onstage;
mod speaker;
mod stagegroup;
mod structure;


pub use onstage::{track_onstage, FlushPolicy, Presence, StageCue};
pub use speaker::resolve_speakers;
pub use stagegroup::stagegroups;
pub use structure::{acts, scenes, ACT_LEVEL_SCENE, EPILOGUE_ACT, INDUCTION_ACT};

use crate::pipeline::PipelineResult;
use crate::tei::{SpeechAct, StructuralRecord};
use crate::util::{sort_join_strings, string_to_set};
use std::collections::BTreeSet;

/// A set of character identifiers, iterated in sorted order
pub type CharacterSet = BTreeSet<String>;

/// A structural record with its position in the play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRecord {
    pub record: StructuralRecord,
    /// 0 for inductions and prologues, 6 for epilogues
    pub act: u32,
    /// 0 at act level
    pub scene: u32,
    /// Parsed `who` attribute
    pub who: Option<CharacterSet>,
    pub onstage: CharacterSet,
    /// Index of the run of identical onstage sets (`stagegroup_raw`)
    pub stagegroup: u32,
    /// Normalized speaker of the enclosing speech act
    pub speaker: Option<String>,
}

impl AnnotatedRecord {
    /// Onstage set as a sorted, space-joined string
    pub fn onstage_string(&self) -> String {
        sort_join_strings(&self.onstage)
    }

    /// `who` as a sorted, space-joined string
    pub fn who_string(&self) -> Option<String> {
        self.who.as_ref().map(sort_join_strings)
    }
}

/// Run every annotation stage over the flattened records.
pub fn annotate(
    records: Vec<StructuralRecord>,
    speech: &[SpeechAct],
    policy: FlushPolicy,
) -> PipelineResult<Vec<AnnotatedRecord>> {
    let acts = acts(&records)?;
    let scenes = scenes(&records)?;
    let onstage = track_onstage(&records, &acts, &scenes, policy)?;
    let groups = stagegroups(&onstage);
    let speakers = resolve_speakers(&records, speech);

    tracing::debug!(
        records = records.len(),
        stagegroups = groups.last().map_or(0, |g| g + 1),
        flush = %policy,
        "annotated records"
    );

    Ok(records
        .into_iter()
        .zip(acts)
        .zip(scenes)
        .zip(onstage)
        .zip(groups)
        .zip(speakers)
        .map(|(((((record, act), scene), onstage), stagegroup), speaker)| {
            let who = record.who().map(string_to_set);
            AnnotatedRecord {
                record,
                act,
                scene,
                who,
                onstage,
                stagegroup,
                speaker,
            }
        })
        .collect())
}
