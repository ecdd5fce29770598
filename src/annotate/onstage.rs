//! Stage-presence tracking
//!
//! A fold over the records in document order. The accumulator carries the
//! onstage set plus the act and scene of the previous record; entrances
//! and attributed speech add characters, exits remove them.
//!
//! Characters are flushed at act boundaries (and, under
//! [`FlushPolicy::ActAndScene`], at scene boundaries). Flushing bounds the
//! damage of missing exits, e.g. a character who dies without an `exit`
//! direction. It is wrong where exits are marked lazily across scenes
//! ("Exeunt all but ..."), and those errors are reproduced as-is; the
//! speaker-implies-present rule limits them.

use super::CharacterSet;
use crate::pipeline::{PipelineError, PipelineResult};
use crate::tei::{kind, tag, RecordLocator, StructuralRecord};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where the tracker forgets who is on stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlushPolicy {
    /// Flush whenever the act changes
    #[default]
    Act,
    /// Flush whenever the act or the scene changes
    ActAndScene,
}

impl FromStr for FlushPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "act" => Ok(Self::Act),
            "act-and-scene" => Ok(Self::ActAndScene),
            other => Err(format!(
                "unknown flush policy '{}' (expected 'act' or 'act-and-scene')",
                other
            )),
        }
    }
}

impl std::fmt::Display for FlushPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Act => write!(f, "act"),
            Self::ActAndScene => write!(f, "act-and-scene"),
        }
    }
}

/// A record as seen by the tracker
#[derive(Debug, Clone, Copy)]
pub struct StageCue<'a> {
    pub position: usize,
    pub record: &'a StructuralRecord,
    pub act: u32,
    pub scene: u32,
}

/// Rolling tracker state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Presence {
    pub onstage: CharacterSet,
    pub act: u32,
    pub scene: u32,
}

impl Presence {
    /// State before the first record: nobody on stage, act 0, scene 0
    pub fn initial() -> Self {
        Self::default()
    }

    /// Apply one record, producing the state after it.
    pub fn advance(self, cue: StageCue<'_>, policy: FlushPolicy) -> PipelineResult<Presence> {
        let boundary = match policy {
            FlushPolicy::Act => cue.act != self.act,
            FlushPolicy::ActAndScene => cue.act != self.act || cue.scene != self.scene,
        };
        let mut onstage = if boundary { CharacterSet::new() } else { self.onstage };

        let record = cue.record;
        if is_entrance(record) || has_speaker(record) {
            onstage.extend(cue_characters(&cue)?);
        } else if is_exit(record) {
            for character in cue_characters(&cue)? {
                onstage.remove(&character);
            }
        }

        Ok(Presence {
            onstage,
            act: cue.act,
            scene: cue.scene,
        })
    }
}

fn is_entrance(record: &StructuralRecord) -> bool {
    record.is_tag(tag::STAGE) && record.has_kind(kind::ENTRANCE)
}

fn is_exit(record: &StructuralRecord) -> bool {
    record.is_tag(tag::STAGE) && record.has_kind(kind::EXIT)
}

fn has_speaker(record: &StructuralRecord) -> bool {
    record.is_tag(tag::SPEECH) && record.who().is_some()
}

/// The `who` set of an entrance, exit, or speech; a movement cue without
/// `who` leaves the onstage set undefined.
fn cue_characters(cue: &StageCue<'_>) -> PipelineResult<CharacterSet> {
    cue.record
        .who()
        .map(crate::util::string_to_set)
        .ok_or_else(|| {
            PipelineError::PresenceInvariantViolation(format!(
                "{} moves characters but has no `who` attribute",
                RecordLocator::new(cue.position, cue.record)
            ))
        })
}

/// Onstage set after every record, in order.
pub fn track_onstage(
    records: &[StructuralRecord],
    acts: &[u32],
    scenes: &[u32],
    policy: FlushPolicy,
) -> PipelineResult<Vec<CharacterSet>> {
    if acts.len() != records.len() || scenes.len() != records.len() {
        return Err(PipelineError::PresenceInvariantViolation(format!(
            "{} records but {} act and {} scene labels",
            records.len(),
            acts.len(),
            scenes.len()
        )));
    }

    let mut onstage = Vec::with_capacity(records.len());
    records
        .iter()
        .zip(acts.iter().zip(scenes))
        .enumerate()
        .try_fold(Presence::initial(), |state, (position, (record, (&act, &scene)))| {
            let cue = StageCue {
                position,
                record,
                act,
                scene,
            };
            let next = state.advance(cue, policy)?;
            onstage.push(next.onstage.clone());
            Ok::<_, PipelineError>(next)
        })?;
    Ok(onstage)
}
