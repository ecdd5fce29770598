//! Per-line token counts of spoken words

use crate::annotate::AnnotatedRecord;
use crate::tei::tag;
use std::collections::BTreeMap;

/// Prefix of `n` on words inside stage directions
pub const STAGE_DIRECTION_PREFIX: &str = "SD";

/// Tokens of one spoken line under one onstage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    pub act: u32,
    pub scene: u32,
    pub stagegroup_raw: u32,
    pub onstage: String,
    pub speaker: String,
    /// Line number, e.g. `1.1.20`
    pub line: String,
    pub n_tokens: u64,
    /// Smallest `xml:id` among the line's words; orders the lines
    pub first_id: Option<String>,
}

type LineKey = (u32, u32, u32, String, String, String);

/// Count spoken words per line, ordered by each line's first word id.
///
/// Words without a line number or a speaker are not counted.
pub fn line_tokens(records: &[AnnotatedRecord]) -> Vec<LineTokens> {
    let mut groups: BTreeMap<LineKey, (u64, Option<String>)> = BTreeMap::new();

    for annotated in records.iter().filter(|a| is_spoken_word(a)) {
        let (Some(line), Some(speaker)) = (annotated.record.number(), annotated.speaker.as_ref())
        else {
            continue;
        };
        let key = (
            annotated.act,
            annotated.scene,
            annotated.stagegroup,
            annotated.onstage_string(),
            speaker.clone(),
            line.to_string(),
        );
        let entry = groups.entry(key).or_insert((0, None));
        entry.0 += 1;
        if let Some(id) = annotated.record.id() {
            if entry.1.as_deref().map_or(true, |current| id < current) {
                entry.1 = Some(id.to_string());
            }
        }
    }

    let mut lines: Vec<LineTokens> = groups
        .into_iter()
        .map(
            |((act, scene, stagegroup_raw, onstage, speaker, line), (n_tokens, first_id))| {
                LineTokens {
                    act,
                    scene,
                    stagegroup_raw,
                    onstage,
                    speaker,
                    line,
                    n_tokens,
                    first_id,
                }
            },
        )
        .collect();

    lines.sort_by(|a, b| match (&a.first_id, &b.first_id) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    lines
}

fn is_spoken_word(annotated: &AnnotatedRecord) -> bool {
    annotated.record.is_tag(tag::WORD)
        && !annotated
            .record
            .number()
            .is_some_and(|n| n.starts_with(STAGE_DIRECTION_PREFIX))
}
