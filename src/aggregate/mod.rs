//! Speech aggregation: token and line counts per setting
//!
//! Three steps over the annotated records:
//!
//! 1. [`line_tokens`]: spoken words grouped per line and onstage
//!    configuration, ordered by the first word's `xml:id`
//! 2. [`settings`]: contiguous lines with the same onstage set and speaker
//!    share a setting
//! 3. [`aggregate`]: lines summed per setting, stage groups renumbered
//!    densely from 1

mod lines;
mod setting;

pub use lines::{line_tokens, LineTokens, STAGE_DIRECTION_PREFIX};
pub use setting::settings;

use crate::annotate::AnnotatedRecord;
use crate::pipeline::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column order of the aggregate table
pub const AGGREGATE_COLUMNS: [&str; 9] = [
    "act",
    "scene",
    "stagegroup",
    "stagegroup_raw",
    "setting",
    "onstage",
    "speaker",
    "n_lines",
    "n_tokens",
];

/// One row of the aggregate table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingAggregate {
    pub act: u32,
    pub scene: u32,
    /// Dense stage group number, from 1
    pub stagegroup: u32,
    pub stagegroup_raw: u32,
    pub setting: u32,
    /// Sorted, space-joined onstage identifiers
    pub onstage: String,
    /// Sorted, space-joined speaker identifiers
    pub speaker: String,
    pub n_lines: u64,
    pub n_tokens: u64,
}

impl SettingAggregate {
    /// Onstage identifiers in sorted order
    pub fn onstage_characters(&self) -> Vec<String> {
        crate::util::character_string_to_sorted_list(&self.onstage)
    }

    /// Speaker identifiers in sorted order
    pub fn speakers(&self) -> Vec<String> {
        crate::util::character_string_to_sorted_list(&self.speaker)
    }
}

type SettingKey = (u32, String, String, u32, u32, u32);

/// Build the aggregate table from annotated records.
///
/// Fails if a row would have nobody on stage.
pub fn aggregate(records: &[AnnotatedRecord]) -> PipelineResult<Vec<SettingAggregate>> {
    let lines = line_tokens(records);
    let line_settings = settings(&lines);

    let mut groups: BTreeMap<SettingKey, (u64, u64)> = BTreeMap::new();
    for (line, setting) in lines.iter().zip(line_settings) {
        let key = (
            line.stagegroup_raw,
            line.onstage.clone(),
            line.speaker.clone(),
            setting,
            line.act,
            line.scene,
        );
        let entry = groups.entry(key).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += line.n_tokens;
    }

    let dense: BTreeMap<u32, u32> = groups
        .keys()
        .map(|key| key.0)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .zip(1..)
        .collect();

    let mut rows = Vec::with_capacity(groups.len());
    for ((stagegroup_raw, onstage, speaker, setting, act, scene), (n_lines, n_tokens)) in groups {
        if onstage.is_empty() {
            return Err(PipelineError::PresenceInvariantViolation(format!(
                "nobody on stage while {} speaks (act {}, scene {}, setting {})",
                speaker, act, scene, setting
            )));
        }
        rows.push(SettingAggregate {
            act,
            scene,
            stagegroup: dense.get(&stagegroup_raw).copied().unwrap_or_default(),
            stagegroup_raw,
            setting,
            onstage,
            speaker,
            n_lines,
            n_tokens,
        });
    }
    rows.sort_by_key(|row| row.setting);

    tracing::debug!(
        lines = lines.len(),
        rows = rows.len(),
        "aggregated speech"
    );
    Ok(rows)
}
