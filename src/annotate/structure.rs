//! Act and scene numbering from sparse `type`/`n` markers
//!
//! Markers precede their content in document order, so a forward fill
//! propagates the most recent marker; the backward fill only reaches the
//! records before the first marker.

use crate::pipeline::{PipelineError, PipelineResult};
use crate::tei::{kind, RecordLocator, StructuralRecord};

/// Act number given to inductions and prologues
pub const INDUCTION_ACT: u32 = 0;

/// Act number given to epilogues
pub const EPILOGUE_ACT: u32 = 6;

/// Scene number of act-level markers (acts, inductions, prologues, epilogues)
pub const ACT_LEVEL_SCENE: u32 = 0;

/// Act number of every record.
pub fn acts(records: &[StructuralRecord]) -> PipelineResult<Vec<u32>> {
    let markers = records
        .iter()
        .enumerate()
        .map(|(position, record)| act_marker(position, record))
        .collect::<PipelineResult<Vec<_>>>()?;
    fill(markers, "act")
}

/// Scene number of every record.
pub fn scenes(records: &[StructuralRecord]) -> PipelineResult<Vec<u32>> {
    let markers = records
        .iter()
        .enumerate()
        .map(|(position, record)| scene_marker(position, record))
        .collect::<PipelineResult<Vec<_>>>()?;
    fill(markers, "scene")
}

fn act_marker(position: usize, record: &StructuralRecord) -> PipelineResult<Option<u32>> {
    match record.kind() {
        Some(kind::ACT) => number(position, record).map(Some),
        Some(kind::INDUCTION) | Some(kind::PROLOGUE) => Ok(Some(INDUCTION_ACT)),
        Some(kind::EPILOGUE) => Ok(Some(EPILOGUE_ACT)),
        _ => Ok(None),
    }
}

fn scene_marker(position: usize, record: &StructuralRecord) -> PipelineResult<Option<u32>> {
    match record.kind() {
        Some(kind::ACT) | Some(kind::INDUCTION) | Some(kind::PROLOGUE) | Some(kind::EPILOGUE) => {
            Ok(Some(ACT_LEVEL_SCENE))
        }
        Some(kind::SCENE) => number(position, record).map(Some),
        _ => Ok(None),
    }
}

/// The integer `n` of a marker; missing or non-numeric is a data fault.
fn number(position: usize, record: &StructuralRecord) -> PipelineResult<u32> {
    let raw = record.number().ok_or_else(|| {
        PipelineError::StructuralViolation(format!(
            "{} has no `n` attribute",
            RecordLocator::new(position, record)
        ))
    })?;
    raw.trim().parse::<u32>().map_err(|_| {
        PipelineError::StructuralViolation(format!(
            "{} has non-numeric `n` attribute {:?}",
            RecordLocator::new(position, record),
            raw
        ))
    })
}

/// Forward fill, then backward fill.
fn fill(markers: Vec<Option<u32>>, what: &str) -> PipelineResult<Vec<u32>> {
    if markers.is_empty() {
        return Ok(Vec::new());
    }
    let mut current = markers.iter().flatten().next().copied().ok_or_else(|| {
        PipelineError::StructuralViolation(format!("no {} markers in document body", what))
    })?;
    Ok(markers
        .into_iter()
        .map(|marker| {
            if let Some(value) = marker {
                current = value;
            }
            current
        })
        .collect())
}
